use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Boolean metric value attached to one inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub metric_name: String,
    pub value: bool,
    pub inference_id: Uuid,
    /// Always false: dry runs never reach the feedback sink
    pub dryrun: bool,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
}

impl FeedbackRequest {
    pub fn new(metric_name: impl Into<String>, value: bool, inference_id: Uuid) -> Self {
        Self {
            metric_name: metric_name.into(),
            value,
            inference_id,
            dryrun: false,
            tags: HashMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}
