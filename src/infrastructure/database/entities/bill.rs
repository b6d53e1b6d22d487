//! Bill entity: at most one row per account and billing month

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum BillStatus {
    #[sea_orm(string_value = "issued")]
    Issued,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
    #[sea_orm(string_value = "partial")]
    Partial,
}

impl From<domain::BillStatus> for BillStatus {
    fn from(s: domain::BillStatus) -> Self {
        match s {
            domain::BillStatus::Issued => Self::Issued,
            domain::BillStatus::Paid => Self::Paid,
            domain::BillStatus::Overdue => Self::Overdue,
            domain::BillStatus::Partial => Self::Partial,
        }
    }
}

impl From<BillStatus> for domain::BillStatus {
    fn from(s: BillStatus) -> Self {
        match s {
            BillStatus::Issued => Self::Issued,
            BillStatus::Paid => Self::Paid,
            BillStatus::Overdue => Self::Overdue,
            BillStatus::Partial => Self::Partial,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// BILL-{account:06}-{yyyymm}
    pub bill_number: String,

    pub account_id: i32,

    pub meter_id: String,

    pub billing_year: i32,

    pub billing_month: i32,

    /// Thousandths of a unit
    pub consumption: i64,

    // Amounts below are in minor currency units
    pub consumption_charge: i64,

    pub fixed_charge: i64,

    pub tax_amount: i64,

    pub total_amount: i64,

    pub period_start: NaiveDate,

    pub period_end: NaiveDate,

    pub issued_at: DateTime<Utc>,

    pub due_date: NaiveDate,

    pub status: BillStatus,

    pub used_fallback: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
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
