mod client;
mod error;
mod interpret;
mod request;
mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::*;
pub use error::*;
pub use interpret::*;
pub use request::*;
pub use transport::*;

/// Hosted inference endpoint used when none is configured.
pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/siebert/sentiment-roberta-large-english";
