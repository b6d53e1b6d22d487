//! Create tariff_sets and tariff_slabs tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TariffSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TariffSets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TariffSets::Name).string().not_null())
                    .col(ColumnDef::new(TariffSets::Region).string().not_null())
                    .col(ColumnDef::new(TariffSets::Locality).string().not_null())
                    .col(ColumnDef::new(TariffSets::Department).string_len(20).not_null())
                    .col(ColumnDef::new(TariffSets::Category).string_len(20).not_null())
                    .col(
                        ColumnDef::new(TariffSets::FixedCharge)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TariffSets::TaxPercentage)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TariffSets::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TariffSets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TariffSets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Scope lookup; the newest active set of a scope wins
        manager
            .create_index(
                Index::create()
                    .name("idx_tariff_sets_scope")
                    .table(TariffSets::Table)
                    .col(TariffSets::Region)
                    .col(TariffSets::Locality)
                    .col(TariffSets::Department)
                    .col(TariffSets::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TariffSlabs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TariffSlabs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TariffSlabs::TariffSetId).integer().not_null())
                    .col(ColumnDef::new(TariffSlabs::FromUnits).big_integer().not_null())
                    .col(ColumnDef::new(TariffSlabs::ToUnits).big_integer())
                    .col(ColumnDef::new(TariffSlabs::RatePerUnit).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tariff_slabs_set")
                            .from(TariffSlabs::Table, TariffSlabs::TariffSetId)
                            .to(TariffSets::Table, TariffSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tariff_slabs_set_from")
                    .table(TariffSlabs::Table)
                    .col(TariffSlabs::TariffSetId)
                    .col(TariffSlabs::FromUnits)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TariffSlabs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TariffSets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TariffSets {
    Table,
    Id,
    Name,
    Region,
    Locality,
    Department,
    Category,
    FixedCharge,
    TaxPercentage,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum TariffSlabs {
    Table,
    Id,
    TariffSetId,
    FromUnits,
    ToUnits,
    RatePerUnit,
}
