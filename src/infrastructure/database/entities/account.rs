//! Account entity, mirrored from the account registry

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::tariff_set::{Department, TariffCategory};
use crate::domain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum ConnectionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "disconnected")]
    Disconnected,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

impl From<ConnectionStatus> for domain::ConnectionStatus {
    fn from(s: ConnectionStatus) -> Self {
        match s {
            ConnectionStatus::Active => Self::Active,
            ConnectionStatus::Disconnected => Self::Disconnected,
            ConnectionStatus::Suspended => Self::Suspended,
        }
    }
}

impl From<domain::ConnectionStatus> for ConnectionStatus {
    fn from(s: domain::ConnectionStatus) -> Self {
        match s {
            domain::ConnectionStatus::Active => Self::Active,
            domain::ConnectionStatus::Disconnected => Self::Disconnected,
            domain::ConnectionStatus::Suspended => Self::Suspended,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub region: String,

    pub locality: String,

    pub department: Department,

    pub category: TariffCategory,

    pub meter_id: String,

    pub connection_status: ConnectionStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bill::Entity")]
    Bills,
    #[sea_orm(has_many = "super::meter_reading::Entity")]
    Readings,
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl Related<super::meter_reading::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Readings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
