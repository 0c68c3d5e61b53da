//! Single-trial execution and outcome classification

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    CacheOptions, ContentBlock, CorrectnessPredicate, DropReason, FeedbackRequest, FeedbackSink,
    InferenceClient, InferenceRequest, InferenceResponse, RunConfiguration, TrialInput,
    TrialOutcome,
};

/// Default gateway function evaluated by the harness
pub const DEFAULT_FUNCTION_NAME: &str = "answer_question";

/// Runs one trial against the inference client and scores the answer.
///
/// Every failure path ends in a [`TrialOutcome`]; nothing is returned as an
/// error, so one bad trial cannot abort a batch.
pub struct TrialExecutor {
    client: Arc<dyn InferenceClient>,
    feedback: Arc<dyn FeedbackSink>,
    predicate: Arc<dyn CorrectnessPredicate>,
    function_name: String,
    metric_name: String,
    cache_options: CacheOptions,
}

impl TrialExecutor {
    pub fn new(
        client: Arc<dyn InferenceClient>,
        feedback: Arc<dyn FeedbackSink>,
        predicate: Arc<dyn CorrectnessPredicate>,
    ) -> Self {
        let metric_name = predicate.name().to_string();
        Self {
            client,
            feedback,
            predicate,
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            metric_name,
            cache_options: CacheOptions::default(),
        }
    }

    pub fn with_function_name(mut self, function_name: impl Into<String>) -> Self {
        self.function_name = function_name.into();
        self
    }

    /// Metric name used for feedback; defaults to the predicate's name
    pub fn with_metric_name(mut self, metric_name: impl Into<String>) -> Self {
        self.metric_name = metric_name.into();
        self
    }

    pub fn with_cache_options(mut self, cache_options: CacheOptions) -> Self {
        self.cache_options = cache_options;
        self
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn metric_name(&self) -> &str {
        &self.metric_name
    }

    /// Run one trial and classify its outcome
    pub async fn run_trial(&self, input: &TrialInput, config: &RunConfiguration) -> TrialOutcome {
        let request = InferenceRequest::question(&self.function_name, input.question())
            .with_variant(config.variant_name.clone())
            .with_dryrun(config.dry_run)
            .with_cache_options(self.cache_options.clone());

        let response = match self.client.infer(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(trial_id = input.id(), error = %e, "Inference failed, dropping trial");
                return TrialOutcome::dropped(DropReason::Transport);
            }
        };

        let correct = match self.classify(input, &response) {
            Some(correct) => correct,
            None => {
                warn!(
                    trial_id = input.id(),
                    inference_id = %response.inference_id,
                    "Response carried no content blocks, dropping trial"
                );
                return TrialOutcome::dropped(DropReason::MalformedResponse);
            }
        };

        debug!(
            trial_id = input.id(),
            inference_id = %response.inference_id,
            variant = %response.variant_name,
            correct,
            "Trial scored"
        );

        if !config.dry_run {
            self.report_feedback(input, &response, correct).await;
        }

        TrialOutcome::Success { correct }
    }

    /// `None` when there is nothing to score; a non-text first block is incorrect
    fn classify(&self, input: &TrialInput, response: &InferenceResponse) -> Option<bool> {
        match response.first_block()? {
            ContentBlock::Text { text } => Some(self.predicate.is_correct(text, input)),
            other => {
                debug!(
                    trial_id = input.id(),
                    kind = other.kind(),
                    "First content block is not text, scoring as incorrect"
                );
                Some(false)
            }
        }
    }

    async fn report_feedback(&self, input: &TrialInput, response: &InferenceResponse, correct: bool) {
        let request = FeedbackRequest::new(&self.metric_name, correct, response.inference_id)
            .with_tag("trial_id", input.id());

        if let Err(e) = self.feedback.report(request).await {
            warn!(
                trial_id = input.id(),
                inference_id = %response.inference_id,
                error = %e,
                "Feedback delivery failed"
            );
        }
    }
}

impl std::fmt::Debug for TrialExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrialExecutor")
            .field("function_name", &self.function_name)
            .field("metric_name", &self.metric_name)
            .field("cache_options", &self.cache_options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feedback::MockFeedbackSink;
    use crate::domain::inference::MockInferenceClient;
    use crate::domain::scoring::ExactMatch;
    use crate::domain::DomainError;

    fn input() -> TrialInput {
        TrialInput::new("q1", "What is 2+2?", "4")
    }

    fn text_response(text: &str) -> InferenceResponse {
        InferenceResponse::new("baseline", vec![ContentBlock::text(text)])
    }

    fn executor(client: MockInferenceClient, sink: MockFeedbackSink) -> TrialExecutor {
        TrialExecutor::new(Arc::new(client), Arc::new(sink), Arc::new(ExactMatch))
    }

    #[tokio::test]
    async fn test_correct_answer_reports_feedback() {
        let response = text_response("4");
        let inference_id = response.inference_id;

        let mut client = MockInferenceClient::new();
        client
            .expect_infer()
            .withf(|request| {
                request.question_text() == Some("What is 2+2?")
                    && request.variant_name.as_deref() == Some("baseline")
                    && !request.dryrun
            })
            .times(1)
            .returning(move |_| Ok(response.clone()));

        let mut sink = MockFeedbackSink::new();
        sink.expect_report()
            .withf(move |request| {
                request.metric_name == "exact_match"
                    && request.value
                    && request.inference_id == inference_id
                    && request.tags.get("trial_id").map(String::as_str) == Some("q1")
            })
            .times(1)
            .returning(|_| Ok(()));

        let config = RunConfiguration::new().with_variant("baseline");
        let outcome = executor(client, sink).run_trial(&input(), &config).await;

        assert_eq!(outcome, TrialOutcome::correct());
    }

    #[tokio::test]
    async fn test_incorrect_answer() {
        let mut client = MockInferenceClient::new();
        client
            .expect_infer()
            .returning(|_| Ok(text_response("5")));

        let mut sink = MockFeedbackSink::new();
        sink.expect_report()
            .withf(|request| !request.value)
            .times(1)
            .returning(|_| Ok(()));

        let outcome = executor(client, sink)
            .run_trial(&input(), &RunConfiguration::new())
            .await;

        assert_eq!(outcome, TrialOutcome::incorrect());
    }

    #[tokio::test]
    async fn test_transport_failure_is_dropped_without_feedback() {
        let mut client = MockInferenceClient::new();
        client
            .expect_infer()
            .returning(|_| Err(DomainError::transport("gateway", "connection reset")));

        let mut sink = MockFeedbackSink::new();
        sink.expect_report().times(0);

        let outcome = executor(client, sink)
            .run_trial(&input(), &RunConfiguration::new())
            .await;

        assert_eq!(outcome, TrialOutcome::dropped(DropReason::Transport));
    }

    #[tokio::test]
    async fn test_non_text_first_block_scores_incorrect() {
        let mut client = MockInferenceClient::new();
        client.expect_infer().returning(|_| {
            Ok(InferenceResponse::new(
                "baseline",
                vec![
                    ContentBlock::ToolCall {
                        id: "call_1".to_string(),
                        name: "calculator".to_string(),
                        arguments: serde_json::json!({"expr": "2+2"}),
                    },
                    ContentBlock::text("4"),
                ],
            ))
        });

        let mut sink = MockFeedbackSink::new();
        sink.expect_report()
            .withf(|request| !request.value)
            .times(1)
            .returning(|_| Ok(()));

        let outcome = executor(client, sink)
            .run_trial(&input(), &RunConfiguration::new())
            .await;

        assert_eq!(outcome, TrialOutcome::incorrect());
    }

    #[tokio::test]
    async fn test_empty_content_is_dropped() {
        let mut client = MockInferenceClient::new();
        client
            .expect_infer()
            .returning(|_| Ok(InferenceResponse::new("baseline", vec![])));

        let mut sink = MockFeedbackSink::new();
        sink.expect_report().times(0);

        let outcome = executor(client, sink)
            .run_trial(&input(), &RunConfiguration::new())
            .await;

        assert_eq!(outcome, TrialOutcome::dropped(DropReason::MalformedResponse));
    }

    #[tokio::test]
    async fn test_dry_run_never_reports_feedback() {
        let mut client = MockInferenceClient::new();
        client
            .expect_infer()
            .withf(|request| request.dryrun)
            .returning(|_| Ok(text_response("4")));

        let mut sink = MockFeedbackSink::new();
        sink.expect_report().times(0);

        let config = RunConfiguration::new().with_dry_run(true);
        let outcome = executor(client, sink).run_trial(&input(), &config).await;

        assert_eq!(outcome, TrialOutcome::correct());
    }

    #[tokio::test]
    async fn test_feedback_failure_does_not_change_outcome() {
        let mut client = MockInferenceClient::new();
        client
            .expect_infer()
            .returning(|_| Ok(text_response("4")));

        let mut sink = MockFeedbackSink::new();
        sink.expect_report()
            .times(1)
            .returning(|_| Err(DomainError::feedback("sink unavailable")));

        let outcome = executor(client, sink)
            .run_trial(&input(), &RunConfiguration::new())
            .await;

        assert_eq!(outcome, TrialOutcome::correct());
    }

    #[tokio::test]
    async fn test_custom_function_and_metric() {
        let mut client = MockInferenceClient::new();
        client
            .expect_infer()
            .withf(|request| request.function_name == "math_qa")
            .returning(|_| Ok(text_response("4")));

        let mut sink = MockFeedbackSink::new();
        sink.expect_report()
            .withf(|request| request.metric_name == "math_accuracy")
            .times(1)
            .returning(|_| Ok(()));

        let executor = executor(client, sink)
            .with_function_name("math_qa")
            .with_metric_name("math_accuracy");

        assert_eq!(executor.function_name(), "math_qa");
        let outcome = executor.run_trial(&input(), &RunConfiguration::new()).await;
        assert!(outcome.is_correct());
    }
}
