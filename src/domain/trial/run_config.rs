use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Default cap on in-flight trials
pub const DEFAULT_MAX_CONCURRENCY: usize = 50;

/// Settings for a single batch run.
///
/// Built once before the run starts and never mutated while trials execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    /// Variant to exercise; `None` lets the gateway pick one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    /// Suppress every persistence side effect (feedback writes)
    #[serde(default)]
    pub dry_run: bool,
    /// Maximum number of trials in flight at once
    pub max_concurrency: usize,
    /// Run only the first `n` inputs; `None` runs all of them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<usize>,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            variant_name: None,
            dry_run: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            sample_size: None,
        }
    }
}

impl RunConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_variant(mut self, variant_name: impl Into<String>) -> Self {
        self.variant_name = Some(variant_name.into());
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    #[must_use]
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    /// Reject settings that would make the run meaningless
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_concurrency == 0 {
            return Err(DomainError::configuration(
                "max_concurrency must be greater than 0",
            ));
        }

        if let Some(variant) = &self.variant_name {
            if variant.trim().is_empty() {
                return Err(DomainError::configuration(
                    "variant_name must not be empty when set",
                ));
            }
        }

        Ok(())
    }

    /// Number of inputs that will actually run out of `available`
    pub fn effective_sample_size(&self, available: usize) -> usize {
        self.sample_size.map_or(available, |n| n.min(available))
    }

    /// Label used in logs and reports
    pub fn variant_label(&self) -> &str {
        self.variant_name.as_deref().unwrap_or("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = RunConfiguration::default();
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert!(!config.dry_run);
        assert!(config.variant_name.is_none());
        assert!(config.sample_size.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RunConfiguration::new()
            .with_variant("baseline")
            .with_dry_run(true)
            .with_max_concurrency(4)
            .with_sample_size(10);

        assert_eq!(config.variant_name.as_deref(), Some("baseline"));
        assert!(config.dry_run);
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.sample_size, Some(10));
        assert_eq!(config.variant_label(), "baseline");
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let result = RunConfiguration::new().with_max_concurrency(0).validate();
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_blank_variant_is_rejected() {
        let result = RunConfiguration::new().with_variant("  ").validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_effective_sample_size() {
        let config = RunConfiguration::new();
        assert_eq!(config.effective_sample_size(7), 7);

        assert_eq!(config.clone().with_sample_size(3).effective_sample_size(7), 3);
        assert_eq!(config.clone().with_sample_size(30).effective_sample_size(7), 7);
        assert_eq!(config.with_sample_size(0).effective_sample_size(7), 0);
    }

    #[test]
    fn test_default_variant_label() {
        assert_eq!(RunConfiguration::new().variant_label(), "default");
    }
}
