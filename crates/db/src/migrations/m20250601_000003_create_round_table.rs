//! Create round table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Round::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Round::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Round::Title).string().not_null())
                    .col(
                        ColumnDef::new(Round::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Round::Reference).string_len(64).null())
                    .col(
                        ColumnDef::new(Round::Stage)
                            .string_len(16)
                            .not_null()
                            .default("custom"),
                    )
                    .col(ColumnDef::new(Round::StartsAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Round::EndsAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Round::DurationDays)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Round::CategoryIds)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Round::SourceRoundId).big_integer().null())
                    .col(
                        ColumnDef::new(Round::ManualEntryIds)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Round::ParticipantIds)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Round::NomineeLimit).integer().null())
                    .col(ColumnDef::new(Round::PlaceLimit).integer().null())
                    .col(ColumnDef::new(Round::ResultEntryIds).json_binary().null())
                    .col(ColumnDef::new(Round::ResultRankings).json_binary().null())
                    .col(
                        ColumnDef::new(Round::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Round::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: reference (votes and totals resolve through it)
        manager
            .create_index(
                Index::create()
                    .name("idx_round_reference")
                    .table(Round::Table)
                    .col(Round::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (status, starts_at) for the editor overview
        manager
            .create_index(
                Index::create()
                    .name("idx_round_status_starts_at")
                    .table(Round::Table)
                    .col(Round::Status)
                    .col(Round::StartsAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Round::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Round {
    Table,
    Id,
    Title,
    Status,
    Reference,
    Stage,
    StartsAt,
    EndsAt,
    DurationDays,
    CategoryIds,
    SourceRoundId,
    ManualEntryIds,
    ParticipantIds,
    NomineeLimit,
    PlaceLimit,
    ResultEntryIds,
    ResultRankings,
    CreatedAt,
    UpdatedAt,
}
