use serde::{Deserialize, Serialize};

/// How the gateway may use its inference cache for this call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    On,
    #[default]
    Off,
    ReadOnly,
    WriteOnly,
}

/// Cache directives forwarded to the gateway untouched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheOptions {
    pub enabled: CacheMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age_s: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InferenceInput {
    pub messages: Vec<InputMessage>,
}

/// Request sent to the gateway for one trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub function_name: String,
    pub input: InferenceInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    pub dryrun: bool,
    pub cache_options: CacheOptions,
}

impl InferenceRequest {
    /// Single-turn request asking `question` as the user
    pub fn question(function_name: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            input: InferenceInput {
                messages: vec![InputMessage {
                    role: "user".to_string(),
                    content: question.into(),
                }],
            },
            variant_name: None,
            dryrun: false,
            cache_options: CacheOptions::default(),
        }
    }

    pub fn with_variant(mut self, variant_name: Option<String>) -> Self {
        self.variant_name = variant_name;
        self
    }

    pub fn with_dryrun(mut self, dryrun: bool) -> Self {
        self.dryrun = dryrun;
        self
    }

    pub fn with_cache_options(mut self, cache_options: CacheOptions) -> Self {
        self.cache_options = cache_options;
        self
    }

    /// Text of the first user message
    pub fn question_text(&self) -> Option<&str> {
        self.input
            .messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_request() {
        let request = InferenceRequest::question("answer_question", "What is 2+2?")
            .with_variant(Some("baseline".to_string()))
            .with_dryrun(true);

        assert_eq!(request.function_name, "answer_question");
        assert_eq!(request.question_text(), Some("What is 2+2?"));
        assert_eq!(request.variant_name.as_deref(), Some("baseline"));
        assert!(request.dryrun);
        assert_eq!(request.cache_options.enabled, CacheMode::Off);
    }

    #[test]
    fn test_request_serialization_omits_unset_variant() {
        let request = InferenceRequest::question("answer_question", "hi");
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("variant_name").is_none());
        assert_eq!(json["dryrun"], false);
        assert_eq!(json["cache_options"]["enabled"], "off");
        assert_eq!(json["input"]["messages"][0]["role"], "user");
    }
}
