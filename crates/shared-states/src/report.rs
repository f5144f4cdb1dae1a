use crate::ClassificationResult;
use serde::{Deserialize, Serialize};

/// State of a long running step such as loading the dataset or analyzing a review.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum StatusKind {
    #[default]
    Pending,
    Ok,
    Error,
}

/// Tone of a free-text message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MessageKind {
    #[default]
    Muted,
    Ok,
    Error,
}

/// Status paired with the message describing it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Pending, message)
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Ok, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, message)
    }
}

/// ReportEvent is everything the analyzer can show to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ReportEvent {
    DataStatus(Status),
    ReviewCount(usize),
    TopMessage { text: String, kind: MessageKind },
    Review(String),
    /// Result display reset while a new analysis is pending.
    ResultCleared,
    Result(ClassificationResult),
    ApiMessage { text: String, kind: MessageKind },
    Busy(bool),
}

impl ReportEvent {
    pub fn top_message(text: impl Into<String>, kind: MessageKind) -> Self {
        ReportEvent::TopMessage {
            text: text.into(),
            kind,
        }
    }

    pub fn api_message(text: impl Into<String>, kind: MessageKind) -> Self {
        ReportEvent::ApiMessage {
            text: text.into(),
            kind,
        }
    }
}

/// Report represents a display surface that receives analyzer events.
pub trait Report {
    /// Reflects a single event in the display.
    ///
    /// * `event` - event to show.
    fn report(&self, event: ReportEvent);
}

impl<T: Report + ?Sized> Report for &T {
    fn report(&self, event: ReportEvent) {
        (**self).report(event)
    }
}

impl<T: Report + ?Sized> Report for std::sync::Arc<T> {
    fn report(&self, event: ReportEvent) {
        (**self).report(event)
    }
}
