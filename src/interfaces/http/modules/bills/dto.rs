//! Bill DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Bill, BillStatus};

#[derive(Debug, Serialize, ToSchema)]
pub struct BillResponse {
    pub id: i32,
    pub bill_number: String,
    pub account_id: i32,
    pub meter_id: String,
    pub billing_year: i32,
    pub billing_month: u32,
    #[schema(value_type = String)]
    pub consumption: Decimal,
    #[schema(value_type = String)]
    pub consumption_charge: Decimal,
    #[schema(value_type = String)]
    pub fixed_charge: Decimal,
    #[schema(value_type = String)]
    pub tax_amount: Decimal,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub issued_at: DateTime<Utc>,
    pub due_date: NaiveDate,
    /// `issued`, `paid`, `overdue` or `partial`
    pub status: String,
    pub used_fallback: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Bill> for BillResponse {
    fn from(b: Bill) -> Self {
        Self {
            id: b.id,
            bill_number: b.bill_number,
            account_id: b.account_id,
            meter_id: b.meter_id,
            billing_year: b.period.year,
            billing_month: b.period.month,
            consumption: b.consumption,
            consumption_charge: b.consumption_charge,
            fixed_charge: b.fixed_charge,
            tax_amount: b.tax_amount,
            total_amount: b.total_amount,
            period_start: b.period_start,
            period_end: b.period_end,
            issued_at: b.issued_at,
            due_date: b.due_date,
            status: b.status.to_string(),
            used_fallback: b.used_fallback,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBillStatusRequest {
    /// `paid`, `overdue` or `partial`
    #[schema(value_type = String, example = "paid")]
    pub status: BillStatus,
}
