pub mod bills;
pub mod health;
pub mod metrics;
pub mod readings;
pub mod request_id;
pub mod tariffs;

use std::sync::Arc;

use crate::application::billing::SubmissionOrchestrator;
use crate::domain::RepositoryProvider;

/// State shared by the billing routes
#[derive(Clone)]
pub struct BillingState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub orchestrator: Arc<SubmissionOrchestrator>,
}
