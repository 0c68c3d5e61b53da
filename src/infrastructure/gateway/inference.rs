use async_trait::async_trait;

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, InferenceClient, InferenceRequest, InferenceResponse};

/// Inference client talking to the gateway's `/inference` endpoint
#[derive(Debug)]
pub struct GatewayInferenceClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
    api_key: Option<String>,
}

impl<C: HttpClientTrait> GatewayInferenceClient<C> {
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

    fn inference_url(&self) -> String {
        format!("{}/inference", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> InferenceClient for GatewayInferenceClient<C> {
    async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse, DomainError> {
        let body = serde_json::to_value(&request)
            .map_err(|e| DomainError::internal(format!("Failed to encode request: {}", e)))?;

        let authorization = self.api_key.as_ref().map(|key| format!("Bearer {}", key));
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref value) = authorization {
            headers.push(("Authorization", value.as_str()));
        }

        let json = self
            .client
            .post_json(&self.inference_url(), headers, &body)
            .await?;

        serde_json::from_value(json).map_err(|e| {
            DomainError::malformed_response(format!("Failed to parse inference response: {}", e))
        })
    }
}
