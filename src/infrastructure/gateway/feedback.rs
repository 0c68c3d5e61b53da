use async_trait::async_trait;

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, FeedbackRequest, FeedbackSink};

/// Feedback sink posting to the gateway's `/feedback` endpoint
#[derive(Debug)]
pub struct GatewayFeedbackSink<C: HttpClientTrait> {
    client: C,
    base_url: String,
    api_key: Option<String>,
}

impl<C: HttpClientTrait> GatewayFeedbackSink<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn feedback_url(&self) -> String {
        format!("{}/feedback", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> FeedbackSink for GatewayFeedbackSink<C> {
    async fn report(&self, request: FeedbackRequest) -> Result<(), DomainError> {
        let body = serde_json::to_value(&request)
            .map_err(|e| DomainError::feedback(format!("Failed to encode feedback: {}", e)))?;

        let authorization = self.api_key.as_ref().map(|key| format!("Bearer {}", key));
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref value) = authorization {
            headers.push(("Authorization", value.as_str()));
        }

        self.client
            .post_json(&self.feedback_url(), headers, &body)
            .await
            .map_err(|e| DomainError::feedback(e.to_string()))?;

        Ok(())
    }
}
