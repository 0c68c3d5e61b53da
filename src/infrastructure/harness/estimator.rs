//! Accuracy estimation over trial outcomes

use tracing::debug;

use super::statistical::{wald_interval, z_for_confidence};
use crate::domain::{AccuracyReport, DomainError, OutcomeCounts, TrialOutcome};

/// Default two-tailed confidence level
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Reduces outcomes into a success rate with a Wald confidence interval.
///
/// Dropped trials count toward `total_attempted` but not toward the scored
/// population. The interval is the plain normal approximation and is not
/// adjusted for small samples or rates near 0 or 1.
#[derive(Debug, Clone, Copy)]
pub struct AccuracyEstimator {
    confidence_level: f64,
    z: f64,
}

impl AccuracyEstimator {
    /// Create an estimator for a confidence level in (0, 1)
    pub fn new(confidence_level: f64) -> Result<Self, DomainError> {
        let z = z_for_confidence(confidence_level).ok_or_else(|| {
            DomainError::configuration(format!(
                "confidence_level must be between 0 and 1 (exclusive), got {}",
                confidence_level
            ))
        })?;

        Ok(Self {
            confidence_level,
            z,
        })
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Critical value used for the interval
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Estimate accuracy for an unnamed run
    pub fn estimate(&self, outcomes: &[TrialOutcome]) -> AccuracyReport {
        self.estimate_for("default", outcomes)
    }

    /// Estimate accuracy and label the report with `variant_name`
    pub fn estimate_for(&self, variant_name: &str, outcomes: &[TrialOutcome]) -> AccuracyReport {
        let counts = OutcomeCounts::tally(outcomes);
        let scored = counts.scored();

        let success_rate = (scored > 0).then(|| counts.successes as f64 / scored as f64);
        let interval = wald_interval(counts.successes, scored, self.z, self.confidence_level);

        debug!(
            variant = variant_name,
            attempted = counts.attempted(),
            dropped = counts.dropped,
            scored,
            "Estimated accuracy"
        );

        AccuracyReport::new(variant_name, counts, success_rate, interval)
    }
}

impl Default for AccuracyEstimator {
    fn default() -> Self {
        Self {
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            z: 1.959_963_984_540_054,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DropReason;

    fn outcomes(correct: usize, incorrect: usize, dropped: usize) -> Vec<TrialOutcome> {
        std::iter::repeat_n(TrialOutcome::correct(), correct)
            .chain(std::iter::repeat_n(TrialOutcome::incorrect(), incorrect))
            .chain(std::iter::repeat_n(
                TrialOutcome::dropped(DropReason::Transport),
                dropped,
            ))
            .collect()
    }

    #[test]
    fn test_default_matches_computed_z() {
        let computed = AccuracyEstimator::new(0.95).unwrap();
        let default = AccuracyEstimator::default();
        assert!((computed.z() - default.z()).abs() < 1e-6);
        assert_eq!(default.confidence_level(), 0.95);
    }

    #[test]
    fn test_invalid_confidence_level() {
        assert!(matches!(
            AccuracyEstimator::new(1.0),
            Err(DomainError::Configuration { .. })
        ));
        assert!(AccuracyEstimator::new(0.0).is_err());
    }

    #[test]
    fn test_hundred_trials_scenario() {
        let report = AccuracyEstimator::default().estimate(&outcomes(80, 15, 5));

        assert_eq!(report.total_attempted(), 100);
        assert_eq!(report.total_dropped(), 5);
        assert_eq!(report.scored(), 95);

        let rate = report.success_rate().unwrap();
        assert!((rate - 80.0 / 95.0).abs() < 1e-12);

        let ci = report.confidence_interval().unwrap();
        let expected_margin = 1.959964 * (rate * (1.0 - rate) / 95.0).sqrt();
        assert!((ci.low - (rate - expected_margin)).abs() < 1e-6);
        assert!((ci.high - (rate + expected_margin)).abs() < 1e-6);
    }

    #[test]
    fn test_all_dropped_is_undefined() {
        let report = AccuracyEstimator::default().estimate(&outcomes(0, 0, 3));

        assert_eq!(report.total_attempted(), 3);
        assert_eq!(report.total_dropped(), 3);
        assert!(report.success_rate().is_none());
        assert!(report.confidence_interval().is_none());
    }

    #[test]
    fn test_empty_outcomes_is_undefined() {
        let report = AccuracyEstimator::default().estimate(&[]);
        assert_eq!(report.total_attempted(), 0);
        assert!(report.success_rate().is_none());
    }

    #[test]
    fn test_counts_always_add_up() {
        let estimator = AccuracyEstimator::default();
        for (c, i, d) in [(0, 0, 1), (1, 0, 0), (0, 1, 0), (7, 3, 2), (50, 0, 50), (0, 9, 9)] {
            let report = estimator.estimate(&outcomes(c, i, d));
            assert_eq!(
                report.total_attempted(),
                report.successes() + report.failures() + report.total_dropped()
            );
        }
    }

    #[test]
    fn test_interval_bounds_hold() {
        let estimator = AccuracyEstimator::new(0.99).unwrap();
        for total in 1..=25 {
            for correct in 0..=total {
                let report = estimator.estimate(&outcomes(correct, total - correct, 0));
                let rate = report.success_rate().unwrap();
                let ci = report.confidence_interval().unwrap();

                assert!((0.0..=1.0).contains(&rate));
                assert!(ci.low >= 0.0 && ci.high <= 1.0);
                assert!(ci.low <= rate && rate <= ci.high);
            }
        }
    }

    #[test]
    fn test_two_input_scenario() {
        let report = AccuracyEstimator::default().estimate_for(
            "baseline",
            &[
                TrialOutcome::correct(),
                TrialOutcome::dropped(DropReason::Transport),
            ],
        );

        assert_eq!(report.variant_name(), "baseline");
        assert_eq!(report.total_attempted(), 2);
        assert_eq!(report.total_dropped(), 1);
        assert_eq!(report.success_rate(), Some(1.0));
    }
}
