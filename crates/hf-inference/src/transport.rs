use crate::{ClassificationRequest, TransportError, parse_or_null};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Status returned by the endpoint while the model is still warming up.
pub const COLD_START_STATUS: u16 = 503;

/// One initial attempt plus at most one retry.
pub const MAX_ATTEMPTS: u32 = 2;

/// Raw outcome of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HttpTransport represents an entity able to deliver classification requests.
pub trait HttpTransport {
    /// Sends one request and returns the raw response.
    ///
    /// * `request` - request to deliver.
    ///
    /// # Returns
    /// * Status and body of the response, or the transport failure.
    fn post(
        &self,
        request: &ClassificationRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>>;
}

/// Transport talking to the inference endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    endpoint: String,
}

impl ReqwestTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: &ClassificationRequest) -> Result<RawResponse, TransportError> {
        let body = serde_json::to_vec(&request.payload())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let mut builder = self.client.post(&self.endpoint);
        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.body(body).send().await.map_err(|e| {
            if e.is_builder() {
                TransportError::InvalidRequest(e.to_string())
            } else {
                TransportError::Connection(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// Waits applied between the two attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait after a connection failure.
    pub network_retry_delay: Duration,
    /// Wait after a cold start without a usable `estimated_time`.
    pub cold_start_default: Duration,
    pub cold_start_min: Duration,
    pub cold_start_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            network_retry_delay: Duration::from_millis(1500),
            cold_start_default: Duration::from_millis(2000),
            cold_start_min: Duration::from_millis(2000),
            cold_start_max: Duration::from_millis(15000),
        }
    }
}

impl RetryPolicy {
    /// Wait derived from the `estimated_time` (seconds) of a cold start body.
    pub fn cold_start_delay(&self, body: &str) -> Duration {
        let min = self.cold_start_min.as_millis() as f64;
        let max = self.cold_start_max.as_millis() as f64;

        parse_or_null(body)
            .and_then(|data| data.get("estimated_time").and_then(Value::as_f64))
            .filter(|seconds| seconds.is_finite())
            .map(|seconds| Duration::from_millis((seconds * 1000.0).ceil().clamp(min, max) as u64))
            .unwrap_or(self.cold_start_default)
    }

    /// Decides what follows an attempt.
    ///
    /// # Arguments
    /// * `attempt` - 1-based number of the attempt that produced `outcome`.
    /// * `outcome` - what the attempt returned.
    ///
    /// # Returns
    /// * `Some(wait)` when one more attempt should follow, `None` when `outcome` is final.
    pub fn next_delay(
        &self,
        attempt: u32,
        outcome: &Result<RawResponse, TransportError>,
    ) -> Option<Duration> {
        if attempt >= MAX_ATTEMPTS {
            return None;
        }
        match outcome {
            Err(e) if e.is_retryable() => Some(self.network_retry_delay),
            Ok(response) if response.status == COLD_START_STATUS => {
                Some(self.cold_start_delay(&response.body))
            }
            _ => None,
        }
    }
}

/// Sends a request, retrying once on a connection failure or a cold start.
///
/// # Arguments
/// * `transport` - transport used for every attempt.
/// * `request` - request sent unchanged on both attempts.
/// * `policy` - waits between attempts.
///
/// # Returns
/// * Outcome of the last attempt made.
pub async fn send_with_retry<T>(
    transport: &T,
    request: &ClassificationRequest,
    policy: &RetryPolicy,
) -> Result<RawResponse, TransportError>
where
    T: HttpTransport,
{
    let mut attempt = 1;
    loop {
        debug!(attempt, "Sending classification request");
        let outcome = transport.post(request).await;

        let Some(delay) = policy.next_delay(attempt, &outcome) else {
            match &outcome {
                Ok(response) => debug!(attempt, status = response.status, "Received response"),
                Err(e) => error!(attempt, "Classification request failed: {e}"),
            }
            return outcome;
        };

        match &outcome {
            Ok(response) => info!(
                attempt,
                status = response.status,
                delay_ms = delay.as_millis() as u64,
                "Model is warming up, retrying after cold start delay"
            ),
            Err(e) => warn!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Transport failure, retrying: {e}"
            ),
        }

        sleep(delay).await;
        attempt += 1;
    }
}
