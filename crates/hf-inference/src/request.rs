use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName};
use serde::Serialize;
use std::fmt;

lazy_static! {
    static ref MARKUP_TAG: Regex = Regex::new(r"<[^>]*>").expect("markup tag pattern compiles");
}

/// Replaces every `<...>` span with a single space.
///
/// Entities are left encoded and the result is not trimmed.
pub fn strip_markup(raw: &str) -> String {
    MARKUP_TAG.replace_all(raw, " ").into_owned()
}

/// JSON body accepted by the inference endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InferencePayload<'a> {
    pub inputs: &'a str,
}

/// ClassificationRequest is built fresh for every analysis attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub text: String,
    pub auth_token: Option<String>,
}

impl ClassificationRequest {
    /// Builds a request from a raw review.
    ///
    /// # Arguments
    /// * `raw_text` - review as found in the dataset, may contain markup.
    /// * `token` - user supplied bearer token; blank tokens are dropped.
    pub fn build(raw_text: &str, token: Option<&str>) -> Self {
        let auth_token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);

        Self {
            text: strip_markup(raw_text),
            auth_token,
        }
    }

    pub fn payload(&self) -> InferencePayload<'_> {
        InferencePayload { inputs: &self.text }
    }

    /// Headers sent with the request, authorization only when a token is present.
    pub fn headers(&self) -> Vec<(HeaderName, String)> {
        let mut headers = vec![(CONTENT_TYPE, "application/json".to_string())];
        if let Some(token) = &self.auth_token {
            headers.push((AUTHORIZATION, format!("Bearer {token}")));
        }
        headers
    }
}

impl fmt::Debug for ClassificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationRequest")
            .field("text", &self.text)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
