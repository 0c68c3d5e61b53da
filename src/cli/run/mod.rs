//! Run command - evaluates one or more variants over a JSONL dataset

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{DatasetSource, DomainError, RunConfiguration, ScorerKind};
use crate::infrastructure::dataset::JsonlDataset;
use crate::infrastructure::gateway::{GatewayFeedbackSink, GatewayInferenceClient, HttpClient};
use crate::infrastructure::harness::{AccuracyEstimator, TrialExecutor};
use crate::infrastructure::logging;
use crate::infrastructure::services::EvaluationService;

/// Arguments for the run command
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// JSONL file with one `{"id", "question", "ground_truth"}` object per line
    #[arg(long)]
    pub dataset: PathBuf,

    /// Variant to evaluate; repeat to compare several against the first
    #[arg(long = "variant")]
    pub variants: Vec<String>,

    /// Skip feedback writes
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum trials in flight (overrides config)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Run only the first N inputs
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Shuffle the dataset with this seed before sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Confidence level for the interval (overrides config)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Correctness check: exact, normalized, contains, numeric, regex
    #[arg(long)]
    pub scorer: Option<ScorerKind>,

    /// Gateway base URL (overrides config)
    #[arg(long)]
    pub gateway_url: Option<String>,

    /// Write the full report as JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory holding `default` and `local` config files
    #[arg(long, default_value = "config")]
    pub config_dir: PathBuf,
}

/// Run the evaluation and print the comparison table
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load_from(&args.config_dir).map_err(|e| {
        DomainError::configuration(format!(
            "Failed to load config from {}: {}",
            args.config_dir.display(),
            e
        ))
    })?;
    logging::init_logging(&config.logging);

    let run_config = build_run_configuration(&args, &config);
    run_config.validate()?;

    let estimator =
        AccuracyEstimator::new(args.confidence.unwrap_or(config.run.confidence_level))?;
    let service = EvaluationService::new(Arc::new(build_executor(&args, &config)?), estimator);

    let mut dataset = JsonlDataset::new(&args.dataset);
    if let Some(seed) = args.seed {
        dataset = dataset.with_shuffle_seed(seed);
    }
    let inputs = dataset.load().await?;
    info!(
        dataset = dataset.name(),
        inputs = inputs.len(),
        variants = args.variants.len(),
        "Dataset loaded"
    );

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let report = service
        .compare(dataset.name(), &inputs, &run_config, &args.variants, &cancel)
        .await?;

    println!("{}", report.render_table());

    if let Some(path) = &args.output {
        report.write_json(path).await?;
        info!(path = %path.display(), "Report written");
    }

    Ok(())
}

fn build_run_configuration(args: &RunArgs, config: &AppConfig) -> RunConfiguration {
    let mut run_config = config.run.run_configuration();

    if args.dry_run {
        run_config = run_config.with_dry_run(true);
    }
    if let Some(max_concurrency) = args.max_concurrency {
        run_config = run_config.with_max_concurrency(max_concurrency);
    }
    if let Some(sample_size) = args.sample_size {
        run_config = run_config.with_sample_size(sample_size);
    }

    run_config
}

fn build_executor(args: &RunArgs, config: &AppConfig) -> anyhow::Result<TrialExecutor> {
    let gateway = &config.gateway;
    let base_url = args.gateway_url.as_deref().unwrap_or(&gateway.base_url);
    let http = HttpClient::with_timeout(Duration::from_secs(gateway.timeout_secs))?;

    let mut client = GatewayInferenceClient::new(http.clone(), base_url);
    let mut sink = GatewayFeedbackSink::new(http, base_url);
    if let Some(api_key) = &gateway.api_key {
        client = client.with_api_key(api_key);
        sink = sink.with_api_key(api_key);
    }

    let scorer = args.scorer.unwrap_or(config.run.scorer);
    let predicate = scorer.build(config.run.numeric_tolerance);

    let mut executor = TrialExecutor::new(Arc::new(client), Arc::new(sink), predicate)
        .with_function_name(&gateway.function_name)
        .with_cache_options(config.run.cache_options());
    if let Some(metric_name) = &gateway.metric_name {
        executor = executor.with_metric_name(metric_name);
    }

    Ok(executor)
}

/// Cancel the run on Ctrl+C; trials already in flight finish as dropped
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                warn!("Received Ctrl+C, cancelling outstanding trials");
                cancel.cancel();
            }
            Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn parse(args: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Run(args) => args,
        }
    }

    #[test]
    fn test_parse_minimal() {
        let args = parse(&["pmp-eval-harness", "run", "--dataset", "data.jsonl"]);
        assert_eq!(args.dataset, PathBuf::from("data.jsonl"));
        assert!(args.variants.is_empty());
        assert!(!args.dry_run);
        assert!(args.scorer.is_none());
    }

    #[test]
    fn test_parse_repeated_variants_and_scorer() {
        let args = parse(&[
            "pmp-eval-harness",
            "run",
            "--dataset",
            "data.jsonl",
            "--variant",
            "baseline",
            "--variant",
            "candidate",
            "--scorer",
            "numeric",
            "--dry-run",
        ]);
        assert_eq!(args.variants, vec!["baseline", "candidate"]);
        assert_eq!(args.scorer, Some(ScorerKind::Numeric));
        assert!(args.dry_run);
    }

    #[test]
    fn test_unknown_scorer_is_rejected() {
        let result = Cli::try_parse_from([
            "pmp-eval-harness",
            "run",
            "--dataset",
            "data.jsonl",
            "--scorer",
            "fuzzy",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_command_line_overrides_config() {
        let args = parse(&[
            "pmp-eval-harness",
            "run",
            "--dataset",
            "data.jsonl",
            "--max-concurrency",
            "3",
            "--sample-size",
            "10",
            "--dry-run",
        ]);
        let run_config = build_run_configuration(&args, &AppConfig::default());

        assert_eq!(run_config.max_concurrency, 3);
        assert_eq!(run_config.sample_size, Some(10));
        assert!(run_config.dry_run);
        assert!(run_config.variant_name.is_none());
    }

    #[tokio::test]
    async fn test_invalid_config_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("local.toml"),
            "[run]\ndry_run = true\nscorer = \"fuzzy\"\n",
        )
        .unwrap();

        let config_dir = dir.path().to_string_lossy().into_owned();
        let args = parse(&[
            "pmp-eval-harness",
            "run",
            "--dataset",
            "/nonexistent/data.jsonl",
            "--config-dir",
            &config_dir,
        ]);

        let error = run(args).await.unwrap_err();
        let error = error.downcast_ref::<DomainError>().unwrap();
        assert!(matches!(error, DomainError::Configuration { .. }));
    }

    #[test]
    fn test_config_defaults_apply_without_flags() {
        let args = parse(&["pmp-eval-harness", "run", "--dataset", "data.jsonl"]);
        let mut config = AppConfig::default();
        config.run.max_concurrency = 12;
        config.run.dry_run = true;

        let run_config = build_run_configuration(&args, &config);
        assert_eq!(run_config.max_concurrency, 12);
        assert!(run_config.dry_run);
    }
}
