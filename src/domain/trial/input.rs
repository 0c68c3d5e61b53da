use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single question with the ground truth used to score the answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialInput {
    id: String,
    question: String,
    ground_truth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
}

impl TrialInput {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        ground_truth: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            ground_truth: ground_truth.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn ground_truth(&self) -> &str {
        &self.ground_truth
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }
}
