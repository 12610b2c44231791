//! Create entry table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Entry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entry::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entry::Title).string().not_null())
                    .col(ColumnDef::new(Entry::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Entry::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Entry::InVoting)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Entry::Reference).string_len(64).null())
                    .col(
                        ColumnDef::new(Entry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Entry::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: reference (nullable, so unreferenced entries coexist)
        manager
            .create_index(
                Index::create()
                    .name("idx_entry_reference")
                    .table(Entry::Table)
                    .col(Entry::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (status, in_voting) for nomination pool queries
        manager
            .create_index(
                Index::create()
                    .name("idx_entry_status_in_voting")
                    .table(Entry::Table)
                    .col(Entry::Status)
                    .col(Entry::InVoting)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Entry::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Entry {
    Table,
    Id,
    Title,
    Kind,
    Status,
    InVoting,
    Reference,
    CreatedAt,
    UpdatedAt,
}
