use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::trial::TrialOutcome;

/// Tally of outcomes by class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub successes: usize,
    pub failures: usize,
    pub dropped: usize,
}

impl OutcomeCounts {
    pub fn tally<'a>(outcomes: impl IntoIterator<Item = &'a TrialOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut counts, outcome| {
                match outcome {
                    TrialOutcome::Success { correct: true } => counts.successes += 1,
                    TrialOutcome::Success { correct: false } => counts.failures += 1,
                    TrialOutcome::Dropped { .. } => counts.dropped += 1,
                }
                counts
            })
    }

    pub fn attempted(&self) -> usize {
        self.successes + self.failures + self.dropped
    }

    /// Trials that produced a scorable answer
    pub fn scored(&self) -> usize {
        self.successes + self.failures
    }
}

/// Two-sided interval around the success rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
    /// Confidence level, e.g. 0.95
    pub level: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Accuracy estimate for one run of one variant.
///
/// `success_rate` and `confidence_interval` are `None` when every trial was
/// dropped, since there is nothing to estimate from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    variant_name: String,
    total_attempted: usize,
    total_dropped: usize,
    successes: usize,
    failures: usize,
    success_rate: Option<f64>,
    confidence_interval: Option<ConfidenceInterval>,
    generated_at: DateTime<Utc>,
}

impl AccuracyReport {
    pub fn new(
        variant_name: impl Into<String>,
        counts: OutcomeCounts,
        success_rate: Option<f64>,
        confidence_interval: Option<ConfidenceInterval>,
    ) -> Self {
        Self {
            variant_name: variant_name.into(),
            total_attempted: counts.attempted(),
            total_dropped: counts.dropped,
            successes: counts.successes,
            failures: counts.failures,
            success_rate,
            confidence_interval,
            generated_at: Utc::now(),
        }
    }

    pub fn variant_name(&self) -> &str {
        &self.variant_name
    }

    pub fn total_attempted(&self) -> usize {
        self.total_attempted
    }

    pub fn total_dropped(&self) -> usize {
        self.total_dropped
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Size of the scored population used for the estimate
    pub fn scored(&self) -> usize {
        self.successes + self.failures
    }

    pub fn success_rate(&self) -> Option<f64> {
        self.success_rate
    }

    pub fn confidence_interval(&self) -> Option<&ConfidenceInterval> {
        self.confidence_interval.as_ref()
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Fraction of attempted trials that produced a scorable answer
    pub fn delivery_rate(&self) -> Option<f64> {
        if self.total_attempted == 0 {
            return None;
        }
        Some(self.scored() as f64 / self.total_attempted as f64)
    }

    pub fn drop_rate(&self) -> Option<f64> {
        self.delivery_rate().map(|rate| 1.0 - rate)
    }
}
