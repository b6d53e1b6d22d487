//! Reading DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::billing::{
    BatchItemFailure, BatchItemSuccess, BatchOutcome, ReadingSubmission, SubmissionReceipt,
};
use crate::domain::{ErrorKind, MeterReading, SubmissionChannel};

/// A single meter reading
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitReadingRequest {
    #[validate(range(min = 1, message = "account_id must be positive"))]
    pub account_id: i32,
    #[validate(length(min = 1, max = 64, message = "meter_id is required"))]
    pub meter_id: String,
    /// Accepts a JSON number or a decimal string
    #[schema(value_type = String, example = "1200.000")]
    pub previous_reading: Decimal,
    #[schema(value_type = String, example = "1350.000")]
    pub current_reading: Decimal,
    pub reading_date: NaiveDate,
    /// `portal`, `field_agent`, `batch_import` or `api` (default)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub channel: Option<SubmissionChannel>,
    #[validate(length(max = 128))]
    pub submitted_by: Option<String>,
}

impl From<SubmitReadingRequest> for ReadingSubmission {
    fn from(r: SubmitReadingRequest) -> Self {
        Self {
            account_id: r.account_id,
            meter_id: r.meter_id,
            previous_reading: r.previous_reading,
            current_reading: r.current_reading,
            reading_date: r.reading_date,
            channel: r.channel.unwrap_or_default(),
            submitted_by: r.submitted_by,
        }
    }
}

/// Readings processed independently; one bad item does not fail the rest
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BatchReadingRequest {
    #[validate(length(min = 1, message = "batch must contain at least one reading"))]
    pub readings: Vec<SubmitReadingRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionReceiptResponse {
    pub account_id: i32,
    pub bill_id: i32,
    pub bill_number: String,
    #[schema(value_type = String)]
    pub consumption: Decimal,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub used_fallback: bool,
}

impl From<SubmissionReceipt> for SubmissionReceiptResponse {
    fn from(r: SubmissionReceipt) -> Self {
        Self {
            account_id: r.account_id,
            bill_id: r.bill_id,
            bill_number: r.bill_number,
            consumption: r.consumption,
            total_amount: r.total_amount,
            used_fallback: r.used_fallback,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchSuccessDto {
    /// Zero-based position in the request
    pub index: usize,
    pub receipt: SubmissionReceiptResponse,
}

impl From<BatchItemSuccess> for BatchSuccessDto {
    fn from(s: BatchItemSuccess) -> Self {
        Self {
            index: s.index,
            receipt: s.receipt.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchFailureDto {
    /// Zero-based position in the request
    pub index: usize,
    pub account_id: i32,
    pub error_kind: ErrorKind,
    pub reason: String,
}

impl From<BatchItemFailure> for BatchFailureDto {
    fn from(f: BatchItemFailure) -> Self {
        Self {
            index: f.index,
            account_id: f.account_id,
            error_kind: f.kind,
            reason: f.reason,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchOutcomeResponse {
    pub success_count: usize,
    pub failure_count: usize,
    pub successes: Vec<BatchSuccessDto>,
    pub failures: Vec<BatchFailureDto>,
}

impl From<BatchOutcome> for BatchOutcomeResponse {
    fn from(o: BatchOutcome) -> Self {
        Self {
            success_count: o.success_count,
            failure_count: o.failure_count,
            successes: o.successes.into_iter().map(Into::into).collect(),
            failures: o.failures.into_iter().map(Into::into).collect(),
        }
    }
}

/// Recorded reading
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingResponse {
    pub id: i32,
    pub account_id: i32,
    pub meter_id: String,
    pub reading_date: NaiveDate,
    #[schema(value_type = String)]
    pub previous_reading: Decimal,
    #[schema(value_type = String)]
    pub current_reading: Decimal,
    #[schema(value_type = String)]
    pub consumption: Decimal,
    pub channel: String,
    pub submitted_by: Option<String>,
    pub bill_id: Option<i32>,
    pub recorded_at: DateTime<Utc>,
}

impl From<MeterReading> for ReadingResponse {
    fn from(r: MeterReading) -> Self {
        Self {
            consumption: r.consumption(),
            id: r.id,
            account_id: r.account_id,
            meter_id: r.meter_id,
            reading_date: r.reading_date,
            previous_reading: r.previous_value,
            current_reading: r.current_value,
            channel: r.channel.to_string(),
            submitted_by: r.submitted_by,
            bill_id: r.bill_id,
            recorded_at: r.recorded_at,
        }
    }
}
