//! Tariff set entity: one row per jurisdiction, department and category

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain;

/// Utility department
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Department {
    #[sea_orm(string_value = "electricity")]
    Electricity,
    #[sea_orm(string_value = "gas")]
    Gas,
    #[sea_orm(string_value = "water")]
    Water,
}

impl From<domain::Department> for Department {
    fn from(d: domain::Department) -> Self {
        match d {
            domain::Department::Electricity => Self::Electricity,
            domain::Department::Gas => Self::Gas,
            domain::Department::Water => Self::Water,
        }
    }
}

impl From<Department> for domain::Department {
    fn from(d: Department) -> Self {
        match d {
            Department::Electricity => Self::Electricity,
            Department::Gas => Self::Gas,
            Department::Water => Self::Water,
        }
    }
}

/// Tariff category
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum TariffCategory {
    #[sea_orm(string_value = "residential")]
    Residential,
    #[sea_orm(string_value = "commercial")]
    Commercial,
    #[sea_orm(string_value = "industrial")]
    Industrial,
    #[sea_orm(string_value = "agricultural")]
    Agricultural,
}

impl From<domain::TariffCategory> for TariffCategory {
    fn from(c: domain::TariffCategory) -> Self {
        match c {
            domain::TariffCategory::Residential => Self::Residential,
            domain::TariffCategory::Commercial => Self::Commercial,
            domain::TariffCategory::Industrial => Self::Industrial,
            domain::TariffCategory::Agricultural => Self::Agricultural,
        }
    }
}

impl From<TariffCategory> for domain::TariffCategory {
    fn from(c: TariffCategory) -> Self {
        match c {
            TariffCategory::Residential => Self::Residential,
            TariffCategory::Commercial => Self::Commercial,
            TariffCategory::Industrial => Self::Industrial,
            TariffCategory::Agricultural => Self::Agricultural,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tariff_sets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub region: String,

    pub locality: String,

    pub department: Department,

    pub category: TariffCategory,

    /// Fixed charge per bill, in minor currency units
    pub fixed_charge: i64,

    /// Tax rate in hundredths of a percent (1800 = 18.00%)
    pub tax_percentage: i32,

    /// Only active sets are resolved
    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tariff_slab::Entity")]
    Slabs,
}

impl Related<super::tariff_slab::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slabs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
