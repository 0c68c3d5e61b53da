use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::FeedbackRequest;
use crate::domain::DomainError;

/// Destination for per-trial correctness feedback.
///
/// Delivery is best-effort from the harness' point of view: errors are
/// logged by the caller and never change a trial's outcome.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn report(&self, request: FeedbackRequest) -> Result<(), DomainError>;
}
