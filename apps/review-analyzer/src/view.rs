use shared_states::{ClassificationResult, MessageKind, Report, ReportEvent, Sentiment, StatusKind};

const BAR_WIDTH: usize = 20;

/// Renders report events as plain lines on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalView;

impl Report for TerminalView {
    fn report(&self, event: ReportEvent) {
        if let Some(line) = render(&event) {
            println!("{line}");
        }
    }
}

/// Text shown for an event, `None` for events with nothing to print.
pub fn render(event: &ReportEvent) -> Option<String> {
    match event {
        ReportEvent::DataStatus(status) => {
            let marker = match status.kind {
                StatusKind::Pending => "…",
                StatusKind::Ok => "✔",
                StatusKind::Error => "✖",
            };
            Some(format!("[data] {marker} {}", status.message))
        }
        ReportEvent::ReviewCount(count) => Some(format!("[data] {count} reviews")),
        ReportEvent::TopMessage { text, .. } | ReportEvent::ApiMessage { text, .. }
            if text.is_empty() =>
        {
            None
        }
        ReportEvent::TopMessage { text, kind } => Some(format!("{}{text}", prefix(*kind))),
        ReportEvent::Review(review) => Some(format!("\nReview:\n  {review}")),
        ReportEvent::ResultCleared => None,
        ReportEvent::Result(result) => Some(render_result(result)),
        ReportEvent::ApiMessage { text, kind } => Some(format!("[api] {}{text}", prefix(*kind))),
        ReportEvent::Busy(true) => Some("Analyzing…".to_string()),
        ReportEvent::Busy(false) => None,
    }
}

fn prefix(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Muted => "",
        MessageKind::Ok => "ok: ",
        MessageKind::Error => "error: ",
    }
}

fn render_result(result: &ClassificationResult) -> String {
    let icon = match result.sentiment {
        Sentiment::Positive => "👍",
        Sentiment::Negative => "👎",
        Sentiment::Neutral => "?",
    };
    let filled = result
        .confidence_percent()
        .map(|pct| ((pct / 100.0) * BAR_WIDTH as f64).round() as usize)
        .unwrap_or(0)
        .min(BAR_WIDTH);
    format!(
        "Sentiment: {icon} {}  Confidence: {} [{}{}]",
        result.sentiment,
        result.confidence_label(),
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}
