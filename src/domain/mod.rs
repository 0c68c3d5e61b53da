//! Domain layer - Trial model, collaborator seams and report types

pub mod dataset;
pub mod error;
pub mod feedback;
pub mod inference;
pub mod report;
pub mod scoring;
pub mod trial;

pub use dataset::DatasetSource;
pub use error::DomainError;
pub use feedback::{FeedbackRequest, FeedbackSink};
pub use inference::{
    CacheMode, CacheOptions, ContentBlock, InferenceClient, InferenceRequest, InferenceResponse,
    Usage,
};
pub use report::{AccuracyReport, ConfidenceInterval, OutcomeCounts};
pub use scoring::{CorrectnessPredicate, ScorerKind};
pub use trial::{DropReason, RunConfiguration, TrialInput, TrialOutcome};
