//! Submission orchestrator
//!
//! Drives a reading through validate → resolve/compute → bill upsert →
//! reading record. Batches fan out with bounded concurrency and fan back in
//! to a per-item result list; one item's failure never touches another.

use std::sync::Arc;

use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use super::calculator::ChargeBreakdown;
use super::charges::ChargeCalculator;
use super::lifecycle::BillLifecycleManager;
use super::validator;
use crate::config::BillingConfig;
use crate::domain::{
    Account, DomainError, DomainResult, ErrorKind, NewReading, RepositoryProvider,
    SubmissionChannel,
};

/// One meter reading as submitted by a caller
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReadingSubmission {
    pub account_id: i32,
    pub meter_id: String,
    pub previous_reading: Decimal,
    pub current_reading: Decimal,
    pub reading_date: NaiveDate,
    #[serde(default)]
    pub channel: SubmissionChannel,
    #[serde(default)]
    pub submitted_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub account_id: i32,
    pub bill_id: i32,
    pub bill_number: String,
    pub consumption: Decimal,
    pub total_amount: Decimal,
    pub used_fallback: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchItemSuccess {
    /// Position in the submitted batch, zero-based
    pub index: usize,
    pub receipt: SubmissionReceipt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchItemFailure {
    /// Position in the submitted batch, zero-based
    pub index: usize,
    pub account_id: i32,
    pub kind: ErrorKind,
    pub reason: String,
}

/// Outcome of one batch item
#[derive(Debug, Clone, PartialEq)]
pub enum BatchItemResult {
    Succeeded(BatchItemSuccess),
    Failed(BatchItemFailure),
}

impl BatchItemResult {
    fn index(&self) -> usize {
        match self {
            Self::Succeeded(s) => s.index,
            Self::Failed(f) => f.index,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub successes: Vec<BatchItemSuccess>,
    pub failures: Vec<BatchItemFailure>,
    pub success_count: usize,
    pub failure_count: usize,
}

impl BatchOutcome {
    fn from_results(mut results: Vec<BatchItemResult>) -> Self {
        results.sort_by_key(BatchItemResult::index);
        let mut outcome = BatchOutcome::default();
        for result in results {
            match result {
                BatchItemResult::Succeeded(s) => outcome.successes.push(s),
                BatchItemResult::Failed(f) => outcome.failures.push(f),
            }
        }
        outcome.success_count = outcome.successes.len();
        outcome.failure_count = outcome.failures.len();
        outcome
    }
}

pub struct SubmissionOrchestrator {
    repos: Arc<dyn RepositoryProvider>,
    charges: ChargeCalculator,
    lifecycle: BillLifecycleManager,
    batch_concurrency: usize,
    max_batch_size: usize,
}

impl SubmissionOrchestrator {
    pub fn new(repos: Arc<dyn RepositoryProvider>, config: &BillingConfig) -> Self {
        Self {
            charges: ChargeCalculator::new(repos.clone(), config.fallback_rates.clone()),
            lifecycle: BillLifecycleManager::new(repos.clone(), config.due_days),
            repos,
            batch_concurrency: config.batch_concurrency.max(1),
            max_batch_size: config.max_batch_size,
        }
    }

    pub fn charges(&self) -> &ChargeCalculator {
        &self.charges
    }

    pub fn lifecycle(&self) -> &BillLifecycleManager {
        &self.lifecycle
    }

    /// Run one reading through the full pipeline.
    pub async fn submit(&self, submission: ReadingSubmission) -> DomainResult<SubmissionReceipt> {
        let result = self.process(submission).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind().as_str(),
        };
        metrics::counter!("billing_submissions_total", "outcome" => outcome).increment(1);
        result
    }

    /// Run every reading independently.
    ///
    /// Only an unreachable store fails the batch as a whole; it is checked
    /// once before any item is processed.
    pub async fn submit_batch(&self, readings: Vec<ReadingSubmission>) -> DomainResult<BatchOutcome> {
        if readings.len() > self.max_batch_size {
            return Err(DomainError::Validation(format!(
                "batch of {} readings exceeds the limit of {}",
                readings.len(),
                self.max_batch_size
            )));
        }

        self.repos.ping().await.map_err(|e| {
            if e.is_systemic() {
                e
            } else {
                DomainError::StoreUnavailable(e.to_string())
            }
        })?;

        let total = readings.len();
        let results: Vec<BatchItemResult> = stream::iter(readings.into_iter().enumerate())
            .map(|(index, reading)| async move {
                let account_id = reading.account_id;
                match self.submit(reading).await {
                    Ok(receipt) => BatchItemResult::Succeeded(BatchItemSuccess { index, receipt }),
                    Err(e) => {
                        warn!(index, account_id, error = %e, "Batch item failed");
                        BatchItemResult::Failed(BatchItemFailure {
                            index,
                            account_id,
                            kind: e.kind(),
                            reason: e.to_string(),
                        })
                    }
                }
            })
            .buffer_unordered(self.batch_concurrency)
            .collect()
            .await;

        let outcome = BatchOutcome::from_results(results);
        debug_assert_eq!(outcome.success_count + outcome.failure_count, total);

        metrics::counter!("billing_batch_items_total", "outcome" => "success")
            .increment(outcome.success_count as u64);
        metrics::counter!("billing_batch_items_total", "outcome" => "failure")
            .increment(outcome.failure_count as u64);
        info!(
            total,
            succeeded = outcome.success_count,
            failed = outcome.failure_count,
            "Batch submission processed"
        );
        Ok(outcome)
    }

    /// Charges an account would incur for `consumption`. Nothing is written.
    pub async fn preview(
        &self,
        account_id: i32,
        consumption: Decimal,
    ) -> DomainResult<ChargeBreakdown> {
        if consumption.is_sign_negative() && !consumption.is_zero() {
            return Err(DomainError::Validation(format!(
                "consumption must not be negative, got {}",
                consumption
            )));
        }
        let account = self.find_account(account_id).await?;
        self.charges.charge(&account, consumption).await
    }

    async fn find_account(&self, account_id: i32) -> DomainResult<Account> {
        self.repos
            .accounts()
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Account",
                field: "id",
                value: account_id.to_string(),
            })
    }

    async fn process(&self, submission: ReadingSubmission) -> DomainResult<SubmissionReceipt> {
        let consumption =
            validator::validate(submission.previous_reading, submission.current_reading)?;
        let meter_id = validator::validate_fields(
            submission.account_id,
            &submission.meter_id,
            submission.submitted_by.as_deref(),
        )?;

        let account = self.find_account(submission.account_id).await?;

        let breakdown = self.charges.charge(&account, consumption).await?;

        let (bill, _) = self
            .lifecycle
            .upsert_bill(
                consumption,
                &breakdown,
                NewReading {
                    account_id: account.id,
                    meter_id: meter_id.to_string(),
                    reading_date: submission.reading_date,
                    previous_value: submission.previous_reading,
                    current_value: submission.current_reading,
                    channel: submission.channel,
                    submitted_by: submission.submitted_by,
                    bill_id: None,
                },
            )
            .await?;

        info!(
            account_id = account.id,
            bill_number = %bill.bill_number,
            consumption = %consumption,
            total = %bill.total_amount,
            channel = %submission.channel,
            "Reading submitted"
        );

        Ok(SubmissionReceipt {
            account_id: account.id,
            bill_id: bill.id,
            bill_number: bill.bill_number,
            consumption,
            total_amount: bill.total_amount,
            used_fallback: breakdown.used_fallback(),
        })
    }
}
