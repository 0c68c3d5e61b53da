use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Transport error: {target} - {message}")]
    Transport { target: String, message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Feedback delivery failed: {message}")]
    Feedback { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Dataset error: {message}")]
    Dataset { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn transport(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn feedback(message: impl Into<String>) -> Self {
        Self::Feedback {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error came from the inference transport rather than the payload
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
