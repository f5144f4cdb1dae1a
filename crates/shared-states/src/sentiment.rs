use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-way sentiment decision assigned to a review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

/// ClassificationResult is the outcome of one analysis cycle.
///
/// `confidence` is only present when the remote payload carried a finite score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub sentiment: Sentiment,
    pub confidence: Option<f64>,
}

impl ClassificationResult {
    pub fn new(sentiment: Sentiment, confidence: Option<f64>) -> Self {
        Self {
            sentiment,
            confidence,
        }
    }

    /// Fallback used for missing, malformed or failed classifications.
    pub fn neutral() -> Self {
        Self::new(Sentiment::Neutral, None)
    }

    /// Confidence as a percentage clamped to `[0, 100]`.
    pub fn confidence_percent(&self) -> Option<f64> {
        self.confidence
            .filter(|c| c.is_finite())
            .map(|c| (c * 100.0).clamp(0.0, 100.0))
    }

    /// Human readable confidence, `—` when unknown.
    pub fn confidence_label(&self) -> String {
        match self.confidence_percent() {
            Some(pct) => format!("{pct:.1}%"),
            None => "—".to_string(),
        }
    }
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self::neutral()
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.sentiment, self.confidence_label())
    }
}
