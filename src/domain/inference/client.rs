use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{InferenceRequest, InferenceResponse};
use crate::domain::DomainError;

/// Outbound call to the generative function under test.
///
/// Any failure (network, timeout, unparseable body) is reported as an `Err`;
/// the caller decides how to classify it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse, DomainError>;
}
