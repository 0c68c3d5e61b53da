//! Per-variant report tabulation

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::statistical::two_proportion_z_test;
use crate::domain::{AccuracyReport, DomainError};

/// Pairwise significance between two variants' success rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantComparison {
    pub baseline: String,
    pub candidate: String,
    /// Candidate rate minus baseline rate
    pub difference: f64,
    pub p_value: f64,
}

/// Side-by-side accuracy reports for several variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub dataset_name: String,
    pub reports: Vec<AccuracyReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comparisons: Vec<VariantComparison>,
    pub generated_at: DateTime<Utc>,
}

impl ComparisonReport {
    /// Render an aligned text table
    pub fn render_table(&self) -> String {
        let width = self
            .reports
            .iter()
            .map(|r| r.variant_name().len())
            .max()
            .unwrap_or(0)
            .max("variant".len());

        let mut out = String::new();
        let _ = writeln!(out, "Dataset: {}", self.dataset_name);
        let _ = writeln!(
            out,
            "{:<width$}  {:>9}  {:>7}  {:>8}  {:>17}",
            "variant",
            "attempted",
            "dropped",
            "accuracy",
            "confidence",
            width = width
        );

        for report in &self.reports {
            let accuracy = report
                .success_rate()
                .map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0));
            let interval = report.confidence_interval().map_or_else(
                || "n/a".to_string(),
                |ci| format!("[{:.1}%, {:.1}%]", ci.low * 100.0, ci.high * 100.0),
            );

            let _ = writeln!(
                out,
                "{:<width$}  {:>9}  {:>7}  {:>8}  {:>17}",
                report.variant_name(),
                report.total_attempted(),
                report.total_dropped(),
                accuracy,
                interval,
                width = width
            );
        }

        for comparison in &self.comparisons {
            let _ = writeln!(
                out,
                "{} vs {}: {:+.1} pts (p = {:.4})",
                comparison.candidate,
                comparison.baseline,
                comparison.difference * 100.0,
                comparison.p_value
            );
        }

        out
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::internal(format!("Failed to serialize report: {}", e)))
    }

    pub async fn write_json(&self, path: &Path) -> Result<(), DomainError> {
        let json = self.to_json()?;
        tokio::fs::write(path, json).await.map_err(|e| {
            DomainError::internal(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

/// Collects per-variant reports and assembles a [`ComparisonReport`]
#[derive(Debug, Default)]
pub struct ReportAssembler {
    dataset_name: String,
    reports: Vec<AccuracyReport>,
}

impl ReportAssembler {
    pub fn new(dataset_name: impl Into<String>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            reports: Vec::new(),
        }
    }

    pub fn add(&mut self, report: AccuracyReport) -> &mut Self {
        self.reports.push(report);
        self
    }

    /// The first report added is the baseline every other variant is compared to
    pub fn assemble(self) -> ComparisonReport {
        let comparisons = match self.reports.split_first() {
            Some((baseline, candidates)) => candidates
                .iter()
                .filter_map(|candidate| compare(baseline, candidate))
                .collect(),
            None => Vec::new(),
        };

        ComparisonReport {
            dataset_name: self.dataset_name,
            reports: self.reports,
            comparisons,
            generated_at: Utc::now(),
        }
    }
}

fn compare(baseline: &AccuracyReport, candidate: &AccuracyReport) -> Option<VariantComparison> {
    let baseline_rate = baseline.success_rate()?;
    let candidate_rate = candidate.success_rate()?;
    let p_value = two_proportion_z_test(
        baseline.successes(),
        baseline.scored(),
        candidate.successes(),
        candidate.scored(),
    )?;

    Some(VariantComparison {
        baseline: baseline.variant_name().to_string(),
        candidate: candidate.variant_name().to_string(),
        difference: candidate_rate - baseline_rate,
        p_value,
    })
}
