pub mod billing;

// Re-export key types for convenience
pub use billing::{
    BatchOutcome, BillLifecycleManager, ChargeBreakdown, ChargeCalculator, ChargeSource,
    FallbackReason, ReadingSubmission, SubmissionOrchestrator, SubmissionReceipt, TariffResolver,
};
