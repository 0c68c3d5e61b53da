//! Gateway adapters - HTTP implementations of the inference and feedback seams

mod feedback;
mod http_client;
mod inference;

pub use feedback::GatewayFeedbackSink;
pub use http_client::{HttpClient, HttpClientTrait};
pub use inference::GatewayInferenceClient;
