//! Bill domain entities

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bill payment status.
///
/// The engine only ever writes `Issued`; the other states are set by the
/// payment collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Issued,
    Paid,
    Overdue,
    Partial,
}

impl Default for BillStatus {
    fn default() -> Self {
        Self::Issued
    }
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Partial => "partial",
        }
    }
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calendar month a bill belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BillingPeriod {
    pub year: i32,
    /// 1..=12
    pub month: u32,
}

impl BillingPeriod {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The period containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is validated on construction and `containing` copies a real date
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Deterministic bill number: stable for every submission in the period.
    pub fn bill_number(&self, account_id: i32) -> String {
        format!("BILL-{:06}-{}{:02}", account_id, self.year, self.month)
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Persisted invoice for one account and one billing period
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    pub id: i32,
    pub bill_number: String,
    pub account_id: i32,
    pub meter_id: String,
    pub period: BillingPeriod,
    pub consumption: Decimal,
    pub consumption_charge: Decimal,
    pub fixed_charge: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub issued_at: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub status: BillStatus,
    pub used_fallback: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything a bill upsert writes. Status is always reset to `Issued`.
#[derive(Debug, Clone, PartialEq)]
pub struct BillDraft {
    pub bill_number: String,
    pub account_id: i32,
    pub meter_id: String,
    pub period: BillingPeriod,
    pub consumption: Decimal,
    pub consumption_charge: Decimal,
    pub fixed_charge: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub issued_at: DateTime<Utc>,
    pub due_date: NaiveDate,
    pub used_fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bill_number_is_deterministic() {
        let period = BillingPeriod::new(2026, 3).unwrap();
        assert_eq!(period.bill_number(7), "BILL-000007-202603");
        assert_eq!(period.bill_number(7), period.bill_number(7));
        assert_ne!(period.bill_number(7), period.bill_number(8));
    }

    #[test]
    fn period_containing_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let period = BillingPeriod::containing(date);
        assert_eq!(period, BillingPeriod::new(2026, 3).unwrap());
        assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(period.to_string(), "2026-03");
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert!(BillingPeriod::new(2026, 0).is_none());
        assert!(BillingPeriod::new(2026, 13).is_none());
    }
}
