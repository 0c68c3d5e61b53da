//! PMP Eval Harness
//!
//! Runs question/answer trials against an LLM gateway with bounded
//! concurrency and estimates per-variant accuracy:
//! - Concurrency-limited batch runner with cancellation
//! - Pluggable correctness predicates
//! - Wald confidence intervals and variant comparison

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    AccuracyReport, ConfidenceInterval, DomainError, DropReason, RunConfiguration, TrialInput,
    TrialOutcome,
};
pub use infrastructure::harness::{AccuracyEstimator, BatchRunner, TrialExecutor};
pub use infrastructure::services::{EvaluationService, VariantRun};
