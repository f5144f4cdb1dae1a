//! Scripted transport for exercising the retry and analysis flows without a network.

use crate::{ClassificationRequest, HttpTransport, RawResponse, TransportError};
use std::{
    collections::VecDeque,
    sync::Mutex,
    time::Duration,
};
use tokio::time::Instant;

type Outcome = Result<RawResponse, TransportError>;

/// Replays a fixed list of outcomes, one per call, and records every call.
///
/// Once the script runs out every further call fails with a connection error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Outcome>>,
    calls: Mutex<Vec<(Instant, ClassificationRequest)>>,
    latency: Duration,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    /// Makes every call take `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> usize {
        self.lock_calls().len()
    }

    pub fn requests(&self) -> Vec<ClassificationRequest> {
        self.lock_calls().iter().map(|(_, r)| r.clone()).collect()
    }

    /// Time elapsed between consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        self.lock_calls()
            .windows(2)
            .map(|pair| pair[1].0.duration_since(pair[0].0))
            .collect()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(Instant, ClassificationRequest)>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl HttpTransport for ScriptedTransport {
    async fn post(&self, request: &ClassificationRequest) -> Result<RawResponse, TransportError> {
        self.lock_calls().push((Instant::now(), request.clone()));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".to_string())))
    }
}
