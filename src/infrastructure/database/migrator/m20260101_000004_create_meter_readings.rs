//! Create meter_readings table

use sea_orm_migration::prelude::*;

use super::m20260101_000001_create_accounts::Accounts;
use super::m20260101_000003_create_bills::Bills;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MeterReadings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeterReadings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MeterReadings::AccountId).integer().not_null())
                    .col(ColumnDef::new(MeterReadings::MeterId).string().not_null())
                    .col(ColumnDef::new(MeterReadings::ReadingDate).date().not_null())
                    .col(
                        ColumnDef::new(MeterReadings::PreviousValue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeterReadings::CurrentValue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeterReadings::Channel)
                            .string_len(20)
                            .not_null()
                            .default("api"),
                    )
                    .col(ColumnDef::new(MeterReadings::SubmittedBy).string())
                    .col(ColumnDef::new(MeterReadings::BillId).integer())
                    .col(
                        ColumnDef::new(MeterReadings::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meter_readings_account")
                            .from(MeterReadings::Table, MeterReadings::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meter_readings_bill")
                            .from(MeterReadings::Table, MeterReadings::BillId)
                            .to(Bills::Table, Bills::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meter_readings_account_date")
                    .table(MeterReadings::Table)
                    .col(MeterReadings::AccountId)
                    .col(MeterReadings::ReadingDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeterReadings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MeterReadings {
    Table,
    Id,
    AccountId,
    MeterId,
    ReadingDate,
    PreviousValue,
    CurrentValue,
    Channel,
    SubmittedBy,
    BillId,
    RecordedAt,
}
