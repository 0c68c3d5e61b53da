//! Report domain - accuracy estimates for a single variant

mod accuracy;

pub use accuracy::{AccuracyReport, ConfidenceInterval, OutcomeCounts};
