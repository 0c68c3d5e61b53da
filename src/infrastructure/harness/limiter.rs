//! Counting admission gate for in-flight trials

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::domain::DomainError;

/// Bounds the number of concurrently running trials.
///
/// Backed by a FIFO-fair semaphore, so waiters are admitted in arrival
/// order and none starves under sustained load.
#[derive(Clone)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_concurrency: usize,
}

impl ConcurrencyLimiter {
    pub fn new(max_concurrency: usize) -> Result<Self, DomainError> {
        if max_concurrency == 0 {
            return Err(DomainError::configuration(
                "max_concurrency must be greater than 0",
            ));
        }

        if max_concurrency > Semaphore::MAX_PERMITS {
            return Err(DomainError::configuration(format!(
                "max_concurrency must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        })
    }

    /// Wait for a free slot; the slot is released when the permit is dropped
    pub async fn acquire(&self) -> Result<TrialPermit, DomainError> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| DomainError::internal(format!("Concurrency limiter closed: {}", e)))?;

        Ok(TrialPermit { _permit: permit })
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Permits currently held
    pub fn in_flight(&self) -> usize {
        self.max_concurrency - self.semaphore.available_permits()
    }
}

impl std::fmt::Debug for ConcurrencyLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrencyLimiter")
            .field("max_concurrency", &self.max_concurrency)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

/// RAII slot in the limiter
#[must_use = "permit is released when dropped"]
pub struct TrialPermit {
    _permit: OwnedSemaphorePermit,
}

impl std::fmt::Debug for TrialPermit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrialPermit").finish_non_exhaustive()
    }
}
