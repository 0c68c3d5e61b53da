//! Inference domain - request/response model and the client seam

mod client;
mod content;
mod request;
mod response;

pub use client::InferenceClient;
pub use content::ContentBlock;
pub use request::{CacheMode, CacheOptions, InferenceInput, InferenceRequest, InputMessage};
pub use response::{InferenceResponse, Usage};

#[cfg(test)]
pub use client::MockInferenceClient;
