//! Correctness predicates
//!
//! A predicate compares the text of a model answer with the ground truth of
//! the trial input and decides whether the answer is correct.

use std::str::FromStr;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::trial::TrialInput;
use crate::domain::DomainError;

/// Decides whether an answer is correct for a given trial input
pub trait CorrectnessPredicate: Send + Sync {
    /// Name used in reports and as the default feedback metric
    fn name(&self) -> &str;

    fn is_correct(&self, answer: &str, input: &TrialInput) -> bool;
}

/// Trimmed, case-sensitive equality
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatch;

impl CorrectnessPredicate for ExactMatch {
    fn name(&self) -> &str {
        "exact_match"
    }

    fn is_correct(&self, answer: &str, input: &TrialInput) -> bool {
        answer.trim() == input.ground_truth().trim()
    }
}

/// Equality after lowercasing and collapsing whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedMatch;

impl CorrectnessPredicate for NormalizedMatch {
    fn name(&self) -> &str {
        "normalized_match"
    }

    fn is_correct(&self, answer: &str, input: &TrialInput) -> bool {
        normalize(answer) == normalize(input.ground_truth())
    }
}

/// The normalized ground truth appears somewhere in the normalized answer
#[derive(Debug, Clone, Copy, Default)]
pub struct Contains;

impl CorrectnessPredicate for Contains {
    fn name(&self) -> &str {
        "contains"
    }

    fn is_correct(&self, answer: &str, input: &TrialInput) -> bool {
        let truth = normalize(input.ground_truth());
        !truth.is_empty() && normalize(answer).contains(&truth)
    }
}

/// Both sides parse as numbers and differ by at most `tolerance`
#[derive(Debug, Clone, Copy)]
pub struct NumericTolerance {
    tolerance: f64,
}

impl NumericTolerance {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }
}

impl Default for NumericTolerance {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl CorrectnessPredicate for NumericTolerance {
    fn name(&self) -> &str {
        "numeric_tolerance"
    }

    fn is_correct(&self, answer: &str, input: &TrialInput) -> bool {
        match (parse_number(answer), parse_number(input.ground_truth())) {
            (Some(actual), Some(expected)) => (actual - expected).abs() <= self.tolerance,
            _ => false,
        }
    }
}

/// The ground truth is a regex the answer must match.
///
/// An invalid pattern never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexMatch;

impl CorrectnessPredicate for RegexMatch {
    fn name(&self) -> &str {
        "regex_match"
    }

    fn is_correct(&self, answer: &str, input: &TrialInput) -> bool {
        match Regex::new(input.ground_truth()) {
            Ok(re) => re.is_match(answer),
            Err(e) => {
                tracing::warn!(trial_id = input.id(), "Invalid ground truth regex: {}", e);
                false
            }
        }
    }
}

/// Arbitrary scorer backed by a closure
pub struct FnPredicate<F> {
    name: String,
    func: F,
}

impl<F> FnPredicate<F>
where
    F: Fn(&str, &TrialInput) -> bool + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> CorrectnessPredicate for FnPredicate<F>
where
    F: Fn(&str, &TrialInput) -> bool + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn is_correct(&self, answer: &str, input: &TrialInput) -> bool {
        (self.func)(answer, input)
    }
}

/// Built-in predicates selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    Exact,
    Normalized,
    Contains,
    Numeric,
    Regex,
}

impl ScorerKind {
    pub fn build(self, numeric_tolerance: f64) -> Arc<dyn CorrectnessPredicate> {
        match self {
            Self::Exact => Arc::new(ExactMatch),
            Self::Normalized => Arc::new(NormalizedMatch),
            Self::Contains => Arc::new(Contains),
            Self::Numeric => Arc::new(NumericTolerance::new(numeric_tolerance)),
            Self::Regex => Arc::new(RegexMatch),
        }
    }
}

impl FromStr for ScorerKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" | "exact_match" => Ok(Self::Exact),
            "normalized" | "normalized_match" => Ok(Self::Normalized),
            "contains" => Ok(Self::Contains),
            "numeric" | "numeric_tolerance" => Ok(Self::Numeric),
            "regex" | "regex_match" => Ok(Self::Regex),
            other => Err(DomainError::configuration(format!(
                "Unknown scorer '{}'",
                other
            ))),
        }
    }
}

fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
