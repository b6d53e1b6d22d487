//! Create bills table

use sea_orm_migration::prelude::*;

use super::m20260101_000001_create_accounts::Accounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bills::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bills::BillNumber).string().not_null())
                    .col(ColumnDef::new(Bills::AccountId).integer().not_null())
                    .col(ColumnDef::new(Bills::MeterId).string().not_null())
                    .col(ColumnDef::new(Bills::BillingYear).integer().not_null())
                    .col(ColumnDef::new(Bills::BillingMonth).integer().not_null())
                    .col(ColumnDef::new(Bills::Consumption).big_integer().not_null())
                    .col(ColumnDef::new(Bills::ConsumptionCharge).big_integer().not_null())
                    .col(ColumnDef::new(Bills::FixedCharge).big_integer().not_null())
                    .col(ColumnDef::new(Bills::TaxAmount).big_integer().not_null())
                    .col(ColumnDef::new(Bills::TotalAmount).big_integer().not_null())
                    .col(ColumnDef::new(Bills::PeriodStart).date().not_null())
                    .col(ColumnDef::new(Bills::PeriodEnd).date().not_null())
                    .col(
                        ColumnDef::new(Bills::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bills::DueDate).date().not_null())
                    .col(
                        ColumnDef::new(Bills::Status)
                            .string_len(20)
                            .not_null()
                            .default("issued"),
                    )
                    .col(
                        ColumnDef::new(Bills::UsedFallback)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Bills::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bills::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bills_account")
                            .from(Bills::Table, Bills::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Upsert conflict target: one bill per account and month
        manager
            .create_index(
                Index::create()
                    .name("idx_bills_account_period")
                    .table(Bills::Table)
                    .col(Bills::AccountId)
                    .col(Bills::BillingYear)
                    .col(Bills::BillingMonth)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bills::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bills {
    Table,
    Id,
    BillNumber,
    AccountId,
    MeterId,
    BillingYear,
    BillingMonth,
    Consumption,
    ConsumptionCharge,
    FixedCharge,
    TaxAmount,
    TotalAmount,
    PeriodStart,
    PeriodEnd,
    IssuedAt,
    DueDate,
    Status,
    UsedFallback,
    CreatedAt,
    UpdatedAt,
}
