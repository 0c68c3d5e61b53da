//! Evaluation service - runs variants over a dataset and estimates accuracy

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::{AccuracyReport, DomainError, RunConfiguration, TrialInput, TrialOutcome};
use crate::infrastructure::harness::{
    AccuracyEstimator, BatchRunner, ComparisonReport, ReportAssembler, RunProgress, TrialExecutor,
};

/// Outcomes and estimate for one variant run
#[derive(Debug, Clone, Serialize)]
pub struct VariantRun {
    pub config: RunConfiguration,
    pub outcomes: Vec<TrialOutcome>,
    pub report: AccuracyReport,
}

/// Glue between the batch runner and the estimator
#[derive(Debug)]
pub struct EvaluationService {
    runner: BatchRunner,
    estimator: AccuracyEstimator,
}

impl EvaluationService {
    pub fn new(executor: Arc<TrialExecutor>, estimator: AccuracyEstimator) -> Self {
        Self {
            runner: BatchRunner::new(executor),
            estimator,
        }
    }

    /// Run one configuration and estimate its accuracy
    pub async fn evaluate<F>(
        &self,
        inputs: &[TrialInput],
        config: &RunConfiguration,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<VariantRun, DomainError>
    where
        F: Fn(RunProgress),
    {
        let outcomes = self
            .runner
            .run_with_progress(inputs, config, cancel, on_progress)
            .await?;
        let report = self.estimator.estimate_for(config.variant_label(), &outcomes);

        info!(
            variant = report.variant_name(),
            attempted = report.total_attempted(),
            dropped = report.total_dropped(),
            success_rate = ?report.success_rate(),
            "Variant evaluated"
        );

        Ok(VariantRun {
            config: config.clone(),
            outcomes,
            report,
        })
    }

    /// Evaluate each variant in turn with the same inputs and settings.
    ///
    /// An empty `variants` list runs once with the gateway's default variant.
    /// Configuration is validated for every variant before any trial runs.
    pub async fn compare(
        &self,
        dataset_name: &str,
        inputs: &[TrialInput],
        base_config: &RunConfiguration,
        variants: &[String],
        cancel: &CancellationToken,
    ) -> Result<ComparisonReport, DomainError> {
        let configs: Vec<RunConfiguration> = if variants.is_empty() {
            vec![base_config.clone()]
        } else {
            variants
                .iter()
                .map(|variant| base_config.clone().with_variant(variant))
                .collect()
        };

        for config in &configs {
            config.validate()?;
        }

        let mut assembler = ReportAssembler::new(dataset_name);
        for config in &configs {
            let run = self.evaluate(inputs, config, cancel, |_| {}).await?;
            assembler.add(run.report);
        }

        Ok(assembler.assemble())
    }
}
