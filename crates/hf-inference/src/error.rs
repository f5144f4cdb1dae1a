use thiserror::Error;

/// Failure of the underlying HTTP exchange, before any status code is known.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Only connection level failures are worth a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Connection(_))
    }
}

/// Everything that can go wrong while classifying one review.
///
/// The display strings are meant for the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    #[error("Network error contacting Hugging Face API.")]
    Network { reason: String },

    #[error("Invalid classification request: {0}")]
    InvalidRequest(String),

    #[error("Authorization failed. Check Hugging Face token.")]
    Authorization,

    #[error("Rate limited by Hugging Face. Try again later.")]
    RateLimited,

    #[error("{}", describe_remote_api(.status, .detail))]
    RemoteApi { status: u16, detail: Option<String> },

    #[error("{0}")]
    RemoteModel(String),
}

fn describe_remote_api(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!("HF API error (HTTP {status}): {detail}"),
        None => format!("HF API error (HTTP {status})"),
    }
}

impl From<TransportError> for ClassifyError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connection(reason) => ClassifyError::Network { reason },
            TransportError::InvalidRequest(reason) => ClassifyError::InvalidRequest(reason),
        }
    }
}
