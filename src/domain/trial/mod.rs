//! Trial domain - inputs, outcomes and run configuration

mod input;
mod outcome;
mod run_config;

pub use input::TrialInput;
pub use outcome::{DropReason, TrialOutcome};
pub use run_config::{RunConfiguration, DEFAULT_MAX_CONCURRENCY};
