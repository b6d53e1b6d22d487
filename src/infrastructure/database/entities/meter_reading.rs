//! Meter reading entity

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SubmissionChannel {
    #[sea_orm(string_value = "portal")]
    Portal,
    #[sea_orm(string_value = "field_agent")]
    FieldAgent,
    #[sea_orm(string_value = "batch_import")]
    BatchImport,
    #[sea_orm(string_value = "api")]
    Api,
}

impl From<domain::SubmissionChannel> for SubmissionChannel {
    fn from(c: domain::SubmissionChannel) -> Self {
        match c {
            domain::SubmissionChannel::Portal => Self::Portal,
            domain::SubmissionChannel::FieldAgent => Self::FieldAgent,
            domain::SubmissionChannel::BatchImport => Self::BatchImport,
            domain::SubmissionChannel::Api => Self::Api,
        }
    }
}

impl From<SubmissionChannel> for domain::SubmissionChannel {
    fn from(c: SubmissionChannel) -> Self {
        match c {
            SubmissionChannel::Portal => Self::Portal,
            SubmissionChannel::FieldAgent => Self::FieldAgent,
            SubmissionChannel::BatchImport => Self::BatchImport,
            SubmissionChannel::Api => Self::Api,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meter_readings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub account_id: i32,

    pub meter_id: String,

    pub reading_date: NaiveDate,

    /// Thousandths of a unit
    pub previous_value: i64,

    /// Thousandths of a unit
    pub current_value: i64,

    pub channel: SubmissionChannel,

    #[sea_orm(nullable)]
    pub submitted_by: Option<String>,

    #[sea_orm(nullable)]
    pub bill_id: Option<i32>,

    pub recorded_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
