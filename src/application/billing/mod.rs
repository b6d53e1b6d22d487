//! Billing application layer
//!
//! - `calculator`: pure slab arithmetic
//! - `resolver`: tariff lookup by scope
//! - `charges`: resolver + calculator with flat-rate fallback
//! - `validator`: reading order checks
//! - `lifecycle`: one bill per account and billing period
//! - `orchestrator`: single and batch submission pipeline

pub mod calculator;
pub mod charges;
pub mod lifecycle;
pub mod orchestrator;
pub mod resolver;
pub mod validator;

pub use calculator::{ChargeBreakdown, ChargeSource, FallbackReason, SlabCharge};
pub use charges::ChargeCalculator;
pub use lifecycle::BillLifecycleManager;
pub use orchestrator::{
    BatchItemFailure, BatchItemResult, BatchItemSuccess, BatchOutcome, ReadingSubmission,
    SubmissionOrchestrator, SubmissionReceipt,
};
pub use resolver::{TariffResolution, TariffResolver};
