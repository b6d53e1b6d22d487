//! Create accounts table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Region).string().not_null())
                    .col(ColumnDef::new(Accounts::Locality).string().not_null())
                    .col(ColumnDef::new(Accounts::Department).string_len(20).not_null())
                    .col(ColumnDef::new(Accounts::Category).string_len(20).not_null())
                    .col(ColumnDef::new(Accounts::MeterId).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::ConnectionStatus)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_meter_id")
                    .table(Accounts::Table)
                    .col(Accounts::MeterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Accounts {
    Table,
    Id,
    Region,
    Locality,
    Department,
    Category,
    MeterId,
    ConnectionStatus,
    CreatedAt,
    UpdatedAt,
}
