//! Feedback domain - boolean metric feedback tied to an inference

mod request;
mod sink;

pub use request::FeedbackRequest;
pub use sink::FeedbackSink;

#[cfg(test)]
pub use sink::MockFeedbackSink;
