use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One block of model output, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolCall {
        id: String,
        name: String,
        #[serde(default)]
        arguments: Value,
    },
    Thought {
        text: String,
    },
    /// Any block kind this harness does not know about
    #[serde(other)]
    Unknown,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::ToolCall { .. } => "tool_call",
            Self::Thought { .. } => "thought",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_block_round_trip() {
        let block: ContentBlock =
            serde_json::from_str(r#"{"type":"text","text":"Paris"}"#).unwrap();
        assert_eq!(block.as_text(), Some("Paris"));
        assert_eq!(block.kind(), "text");
    }

    #[test]
    fn test_tool_call_block_is_not_text() {
        let block: ContentBlock = serde_json::from_str(
            r#"{"type":"tool_call","id":"c1","name":"search","arguments":{"q":"x"}}"#,
        )
        .unwrap();
        assert!(block.as_text().is_none());
        assert_eq!(block.kind(), "tool_call");
    }

    #[test]
    fn test_unrecognised_block_kind() {
        let block: ContentBlock =
            serde_json::from_str(r#"{"type":"image","url":"https://example.com/x.png"}"#).unwrap();
        assert_eq!(block, ContentBlock::Unknown);
    }
}
