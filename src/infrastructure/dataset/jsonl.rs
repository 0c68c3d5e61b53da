//! JSON Lines dataset loader
//!
//! Each non-blank line is an object with `question` and `ground_truth`
//! fields, plus optional `id` and `metadata`.

use std::path::PathBuf;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domain::{DatasetSource, DomainError, TrialInput};

#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[serde(default)]
    id: Option<String>,
    question: String,
    ground_truth: String,
    #[serde(default)]
    metadata: Option<Value>,
}

/// Dataset backed by a `.jsonl` file
#[derive(Debug, Clone)]
pub struct JsonlDataset {
    name: String,
    path: PathBuf,
    shuffle_seed: Option<u64>,
}

impl JsonlDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());

        Self {
            name,
            path,
            shuffle_seed: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Shuffle deterministically with `seed` after loading
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    fn parse(&self, contents: &str) -> Result<Vec<TrialInput>, DomainError> {
        let mut inputs = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            let record: DatasetRecord = serde_json::from_str(line).map_err(|e| {
                DomainError::dataset(format!(
                    "{}:{}: invalid record: {}",
                    self.path.display(),
                    line_number,
                    e
                ))
            })?;

            let id = record
                .id
                .unwrap_or_else(|| format!("{}-{}", self.name, line_number));
            let mut input = TrialInput::new(id, record.question, record.ground_truth);
            if let Some(metadata) = record.metadata {
                input = input.with_metadata(metadata);
            }
            inputs.push(input);
        }

        Ok(inputs)
    }
}

#[async_trait]
impl DatasetSource for JsonlDataset {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Vec<TrialInput>, DomainError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::dataset(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let mut inputs = self.parse(&contents)?;

        if let Some(seed) = self.shuffle_seed {
            let mut rng = StdRng::seed_from_u64(seed);
            inputs.shuffle(&mut rng);
        }

        info!(dataset = %self.name, count = inputs.len(), "Loaded dataset");
        Ok(inputs)
    }
}
