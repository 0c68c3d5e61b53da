//! Evaluation harness - limiter, executor, runner, estimator and reporting

mod estimator;
mod executor;
mod limiter;
mod report;
mod runner;
pub mod statistical;

pub use estimator::{AccuracyEstimator, DEFAULT_CONFIDENCE_LEVEL};
pub use executor::{TrialExecutor, DEFAULT_FUNCTION_NAME};
pub use limiter::{ConcurrencyLimiter, TrialPermit};
pub use report::{ComparisonReport, ReportAssembler, VariantComparison};
pub use runner::{BatchRunner, RunProgress};
