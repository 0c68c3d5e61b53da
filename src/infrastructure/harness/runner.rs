//! Batch execution of trials under a concurrency cap

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::executor::TrialExecutor;
use super::limiter::ConcurrencyLimiter;
use crate::domain::{
    DomainError, DropReason, OutcomeCounts, RunConfiguration, TrialInput, TrialOutcome,
};

/// Progress events emitted while a batch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunProgress {
    /// Configuration accepted, trials about to be issued
    Started { total: usize },
    /// A trial produced its outcome (including drops)
    TrialCompleted {
        index: usize,
        completed: usize,
        total: usize,
        outcome: TrialOutcome,
    },
}

/// Fans trial inputs out over the executor, gated by a [`ConcurrencyLimiter`].
///
/// Outcome `i` always belongs to input `i`, whatever order trials finish in.
/// A failing trial never stops the batch; every input gets an outcome.
pub struct BatchRunner {
    executor: Arc<TrialExecutor>,
}

impl BatchRunner {
    pub fn new(executor: Arc<TrialExecutor>) -> Self {
        Self { executor }
    }

    /// Run every input (up to `sample_size`) and return outcomes in input order
    pub async fn run(
        &self,
        inputs: &[TrialInput],
        config: &RunConfiguration,
    ) -> Result<Vec<TrialOutcome>, DomainError> {
        self.run_with_cancellation(inputs, config, &CancellationToken::new())
            .await
    }

    /// Same as [`run`](Self::run), stopping early when `cancel` fires.
    ///
    /// Trials not yet issued and trials abandoned mid-flight are recorded as
    /// `Dropped(Cancelled)`.
    pub async fn run_with_cancellation(
        &self,
        inputs: &[TrialInput],
        config: &RunConfiguration,
        cancel: &CancellationToken,
    ) -> Result<Vec<TrialOutcome>, DomainError> {
        self.run_with_progress(inputs, config, cancel, |_| {}).await
    }

    /// Same as [`run_with_cancellation`](Self::run_with_cancellation), calling
    /// `on_progress` as trials complete.
    pub async fn run_with_progress<F>(
        &self,
        inputs: &[TrialInput],
        config: &RunConfiguration,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<Vec<TrialOutcome>, DomainError>
    where
        F: Fn(RunProgress),
    {
        config.validate()?;
        let limiter = ConcurrencyLimiter::new(config.max_concurrency)?;

        let total = config.effective_sample_size(inputs.len());
        let inputs = &inputs[..total];
        let start_time = Instant::now();

        info!(
            variant = config.variant_label(),
            total,
            max_concurrency = config.max_concurrency,
            dry_run = config.dry_run,
            "Starting batch run"
        );
        on_progress(RunProgress::Started { total });

        let completed = AtomicUsize::new(0);
        let trials = inputs.iter().enumerate().map(|(index, input)| {
            let limiter = &limiter;
            let completed = &completed;
            let on_progress = &on_progress;

            async move {
                let outcome = self.run_gated(input, config, limiter, cancel).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                on_progress(RunProgress::TrialCompleted {
                    index,
                    completed: done,
                    total,
                    outcome,
                });
                outcome
            }
        });

        let outcomes = join_all(trials).await;

        let counts = OutcomeCounts::tally(&outcomes);
        info!(
            variant = config.variant_label(),
            successes = counts.successes,
            failures = counts.failures,
            dropped = counts.dropped,
            cancelled = cancel.is_cancelled(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Batch run finished"
        );

        Ok(outcomes)
    }

    async fn run_gated(
        &self,
        input: &TrialInput,
        config: &RunConfiguration,
        limiter: &ConcurrencyLimiter,
        cancel: &CancellationToken,
    ) -> TrialOutcome {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(trial_id = input.id(), "Batch cancelled before trial was issued");
                return TrialOutcome::dropped(DropReason::Cancelled);
            }
            permit = limiter.acquire() => match permit {
                Ok(permit) => permit,
                Err(e) => {
                    warn!(trial_id = input.id(), error = %e, "No slot available, dropping trial");
                    return TrialOutcome::dropped(DropReason::Cancelled);
                }
            },
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(trial_id = input.id(), "Abandoning in-flight trial");
                TrialOutcome::dropped(DropReason::Cancelled)
            }
            outcome = self.executor.run_trial(input, config) => outcome,
        };

        drop(permit);
        outcome
    }
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("executor", &self.executor)
            .finish()
    }
}
