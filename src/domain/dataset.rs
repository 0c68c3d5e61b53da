//! Dataset source seam

use async_trait::async_trait;

use super::trial::TrialInput;
use super::DomainError;

/// Produces the ordered list of trial inputs for a run.
///
/// Ordering, shuffling and splitting are the source's concern; the runner
/// takes the sequence as given.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Name used in reports
    fn name(&self) -> &str;

    async fn load(&self) -> Result<Vec<TrialInput>, DomainError>;
}
