//! Meter reading entities

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a reading entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionChannel {
    Portal,
    FieldAgent,
    BatchImport,
    Api,
}

impl Default for SubmissionChannel {
    fn default() -> Self {
        Self::Api
    }
}

impl SubmissionChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portal => "portal",
            Self::FieldAgent => "field_agent",
            Self::BatchImport => "batch_import",
            Self::Api => "api",
        }
    }
}

impl std::fmt::Display for SubmissionChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded meter observation. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterReading {
    pub id: i32,
    pub account_id: i32,
    pub meter_id: String,
    pub reading_date: NaiveDate,
    pub previous_value: Decimal,
    pub current_value: Decimal,
    pub channel: SubmissionChannel,
    pub submitted_by: Option<String>,
    /// Bill this reading produced or updated
    pub bill_id: Option<i32>,
    pub recorded_at: DateTime<Utc>,
}

impl MeterReading {
    /// Consumption is always derived, never stored.
    pub fn consumption(&self) -> Decimal {
        self.current_value - self.previous_value
    }
}

/// Insert payload for [`MeterReading`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewReading {
    pub account_id: i32,
    pub meter_id: String,
    pub reading_date: NaiveDate,
    pub previous_value: Decimal,
    pub current_value: Decimal,
    pub channel: SubmissionChannel,
    pub submitted_by: Option<String>,
    pub bill_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn consumption_is_current_minus_previous() {
        let reading = MeterReading {
            id: 1,
            account_id: 7,
            meter_id: "MTR-7".into(),
            reading_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            previous_value: dec!(1200.5),
            current_value: dec!(1350.75),
            channel: SubmissionChannel::Portal,
            submitted_by: None,
            bill_id: Some(3),
            recorded_at: Utc::now(),
        };
        assert_eq!(reading.consumption(), dec!(150.25));
    }
}
