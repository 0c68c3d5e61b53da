use std::path::Path;

use serde::Deserialize;

use crate::domain::{CacheMode, CacheOptions, RunConfiguration, ScorerKind};
use crate::domain::trial::DEFAULT_MAX_CONCURRENCY;
use crate::infrastructure::harness::{DEFAULT_CONFIDENCE_LEVEL, DEFAULT_FUNCTION_NAME};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub run: RunDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where and how to reach the inference gateway
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub function_name: String,
    /// Feedback metric; falls back to the scorer's name when unset
    pub metric_name: Option<String>,
}

/// Defaults applied to every run unless overridden on the command line
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunDefaults {
    pub max_concurrency: usize,
    pub dry_run: bool,
    pub confidence_level: f64,
    pub scorer: ScorerKind,
    pub numeric_tolerance: f64,
    pub cache: CacheMode,
    pub cache_max_age_s: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_key: None,
            timeout_secs: 120,
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            metric_name: None,
        }
    }
}

impl Default for RunDefaults {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            dry_run: false,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            scorer: ScorerKind::default(),
            numeric_tolerance: 1e-6,
            cache: CacheMode::default(),
            cache_max_age_s: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl RunDefaults {
    pub fn run_configuration(&self) -> RunConfiguration {
        RunConfiguration::new()
            .with_max_concurrency(self.max_concurrency)
            .with_dry_run(self.dry_run)
    }

    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            enabled: self.cache,
            max_age_s: self.cache_max_age_s,
        }
    }
}

impl AppConfig {
    /// Load `default` and `local` from `dir`, then `APP__*` overrides.
    ///
    /// Missing files fall back to built-in defaults; a file or variable that
    /// is present but invalid is an error.
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let default_file = dir.join("default");
        let local_file = dir.join("local");

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&local_file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.gateway.function_name, DEFAULT_FUNCTION_NAME);
        assert_eq!(config.run.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(config.run.confidence_level, 0.95);
        assert_eq!(config.run.scorer, ScorerKind::Exact);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent")).unwrap();

        assert!(!config.run.dry_run);
        assert_eq!(config.run.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    }

    #[test]
    fn test_load_from_local_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.toml"), "[run]\nmax_concurrency = 4\n").unwrap();
        std::fs::write(dir.path().join("local.toml"), "[run]\ndry_run = true\n").unwrap();

        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.run.max_concurrency, 4);
        assert!(config.run.dry_run);
    }

    #[test]
    fn test_load_from_invalid_local_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("local.toml"),
            "[run]\ndry_run = true\nscorer = \"fuzzy\"\n",
        )
        .unwrap();

        assert!(AppConfig::load_from(dir.path()).is_err());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [gateway]
                base_url = "http://gateway.internal:3000"

                [run]
                max_concurrency = 8
                dry_run = true
                scorer = "numeric"
                cache = "read_only"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.gateway.base_url, "http://gateway.internal:3000");
        assert_eq!(config.gateway.timeout_secs, 120);
        assert_eq!(config.run.max_concurrency, 8);
        assert!(config.run.dry_run);
        assert_eq!(config.run.scorer, ScorerKind::Numeric);
        assert_eq!(config.run.cache_options().enabled, CacheMode::ReadOnly);
        assert_eq!(config.run.confidence_level, 0.95);

        let run = config.run.run_configuration();
        assert_eq!(run.max_concurrency, 8);
        assert!(run.dry_run);
    }
}
