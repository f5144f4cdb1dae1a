use crate::{
    ClassificationRequest, ClassifyError, DecisionPolicy, HttpTransport, RetryPolicy, interpret,
    send_with_retry,
};
use shared_states::ClassificationResult;
use tracing::info;

/// Client running the full classification round trip for one review.
#[derive(Debug, Clone)]
pub struct SentimentClient<T> {
    transport: T,
    retry: RetryPolicy,
    decision: DecisionPolicy,
}

impl<T: HttpTransport> SentimentClient<T> {
    /// Create a new client with the default retry and decision policies.
    ///
    /// # Arguments
    /// * `transport` - transport used to reach the inference endpoint.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            retry: RetryPolicy::default(),
            decision: DecisionPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_decision_policy(mut self, decision: DecisionPolicy) -> Self {
        self.decision = decision;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn decision_policy(&self) -> DecisionPolicy {
        self.decision
    }

    /// Classifies one review.
    ///
    /// # Arguments
    /// * `review` - raw review text, markup is stripped before sending.
    /// * `token` - optional bearer token.
    ///
    /// # Returns
    /// * The sentiment of the review or the classified failure.
    pub async fn classify(
        &self,
        review: &str,
        token: Option<&str>,
    ) -> Result<ClassificationResult, ClassifyError> {
        let request = ClassificationRequest::build(review, token);
        let response = send_with_retry(&self.transport, &request, &self.retry).await?;
        let result = interpret(response.status, &response.body, self.decision)?;

        info!(
            sentiment = %result.sentiment,
            confidence = ?result.confidence,
            "Review classified"
        );

        Ok(result)
    }
}
