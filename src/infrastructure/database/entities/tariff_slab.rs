//! Tariff slab entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tariff_slabs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub tariff_set_id: i32,

    /// Lower bound in thousandths of a unit
    pub from_units: i64,

    /// Upper bound in thousandths of a unit; NULL = unbounded
    #[sea_orm(nullable)]
    pub to_units: Option<i64>,

    /// Rate in 1/10000 of a currency unit per consumption unit
    pub rate_per_unit: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tariff_set::Entity",
        from = "Column::TariffSetId",
        to = "super::tariff_set::Column::Id"
    )]
    TariffSet,
}

impl Related<super::tariff_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TariffSet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
