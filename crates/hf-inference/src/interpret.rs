use crate::ClassifyError;
use serde_json::Value;
use shared_states::{ClassificationResult, Sentiment};
use std::str::FromStr;

/// Score a label has to beat under [`DecisionPolicy::Threshold`].
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Longest raw body excerpt carried in an API error.
pub const MAX_DETAIL_CHARS: usize = 220;

const POSITIVE_LABEL: &str = "POSITIVE";
const NEGATIVE_LABEL: &str = "NEGATIVE";

/// How a top label/score pair becomes a sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionPolicy {
    /// POSITIVE/NEGATIVE count only when the score is above [`DECISION_THRESHOLD`].
    #[default]
    Threshold,
    /// POSITIVE/NEGATIVE count whatever the score.
    LabelOnly,
}

impl DecisionPolicy {
    /// Maps a candidate to a result, the score is kept even when the outcome is neutral.
    ///
    /// `score` is expected in `[0, 1]`; out-of-range scores never reach this point.
    pub fn decide(self, label: &str, score: f64) -> ClassificationResult {
        let confident = match self {
            DecisionPolicy::Threshold => score > DECISION_THRESHOLD,
            DecisionPolicy::LabelOnly => true,
        };
        let sentiment = match label {
            POSITIVE_LABEL if confident => Sentiment::Positive,
            NEGATIVE_LABEL if confident => Sentiment::Negative,
            _ => Sentiment::Neutral,
        };
        ClassificationResult::new(sentiment, Some(score))
    }
}

impl FromStr for DecisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threshold" => Ok(DecisionPolicy::Threshold),
            "label" | "label-only" | "label_only" => Ok(DecisionPolicy::LabelOnly),
            other => Err(format!("unknown decision policy '{other}'")),
        }
    }
}

/// Parses a body as JSON, yielding `None` for empty or non-JSON content.
pub fn parse_or_null(body: &str) -> Option<Value> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

/// Turns a raw endpoint response into a classification.
///
/// # Arguments
/// * `status` - HTTP status of the final attempt.
/// * `body` - raw response body, possibly empty or not JSON at all.
/// * `policy` - how labels are mapped to sentiments.
///
/// # Returns
/// * Classification result, neutral without confidence when the payload is unusable,
///   or the classified error for failed statuses and error payloads.
pub fn interpret(
    status: u16,
    body: &str,
    policy: DecisionPolicy,
) -> Result<ClassificationResult, ClassifyError> {
    let data = parse_or_null(body);

    if !(200..300).contains(&status) {
        return Err(failure_error(status, body, data.as_ref()));
    }

    if let Some(message) = data.as_ref().and_then(error_field) {
        return Err(ClassifyError::RemoteModel(message));
    }

    Ok(classify(data.as_ref(), policy))
}

fn failure_error(status: u16, body: &str, data: Option<&Value>) -> ClassifyError {
    match status {
        401 | 403 => ClassifyError::Authorization,
        429 => ClassifyError::RateLimited,
        _ => ClassifyError::RemoteApi {
            status,
            detail: failure_detail(body, data),
        },
    }
}

/// Best diagnostic available for a failed call, `None` leaves only the status code.
pub fn failure_detail(body: &str, data: Option<&Value>) -> Option<String> {
    if let Some(message) = data.and_then(error_field) {
        return Some(message);
    }
    if let Some(seconds) = data
        .and_then(|d| d.get("estimated_time"))
        .and_then(Value::as_f64)
    {
        return Some(format!("model loading, estimated {seconds}s"));
    }
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    Some(truncate_chars(body, MAX_DETAIL_CHARS))
}

fn error_field(data: &Value) -> Option<String> {
    match data.get("error")? {
        Value::Null => None,
        Value::String(message) if message.trim().is_empty() => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

fn classify(data: Option<&Value>, policy: DecisionPolicy) -> ClassificationResult {
    let Some(candidate) = data.and_then(first_candidate) else {
        return ClassificationResult::neutral();
    };

    let score = candidate
        .get("score")
        .and_then(Value::as_f64)
        .filter(|s| (0.0..=1.0).contains(s));
    let label = candidate.get("label").and_then(Value::as_str);

    match (label, score) {
        (Some(label), Some(score)) => policy.decide(label, score),
        _ => ClassificationResult::neutral(),
    }
}

/// Top candidate of the first result group.
///
/// Accepts the nested `[[{label, score}, ..]]` shape and a flat `[{label, score}, ..]` one.
fn first_candidate(data: &Value) -> Option<&Value> {
    match data.get(0)? {
        Value::Array(group) => group.first(),
        candidate @ Value::Object(_) => Some(candidate),
        _ => None,
    }
}
