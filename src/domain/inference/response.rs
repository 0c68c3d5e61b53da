use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ContentBlock;

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Structured response returned by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub inference_id: Uuid,
    pub episode_id: Uuid,
    pub variant_name: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl InferenceResponse {
    pub fn new(variant_name: impl Into<String>, content: Vec<ContentBlock>) -> Self {
        Self {
            inference_id: Uuid::now_v7(),
            episode_id: Uuid::now_v7(),
            variant_name: variant_name.into(),
            content,
            usage: None,
        }
    }

    pub fn first_block(&self) -> Option<&ContentBlock> {
        self.content.first()
    }
}
