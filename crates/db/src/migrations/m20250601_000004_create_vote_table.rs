//! Create vote ledger table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vote::RoundReference)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vote::ParticipantReference)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vote::Votes)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Vote::LastVoteAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Composite key carries the upsert: one row per pair
                    .primary_key(
                        Index::create()
                            .col(Vote::RoundReference)
                            .col(Vote::ParticipantReference),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: round_reference (for ranking reads across a round)
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_round_reference")
                    .table(Vote::Table)
                    .col(Vote::RoundReference)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vote::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vote {
    Table,
    RoundReference,
    ParticipantReference,
    Votes,
    LastVoteAt,
}
