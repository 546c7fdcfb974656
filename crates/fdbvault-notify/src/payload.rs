use fdbvault_model::{AlertType, NotificationEvent, Priority};
use serde::Serialize;

/// Longest `text` the events API accepts.
pub const MAX_TEXT_CHARS: usize = 4000;

const SOURCE_TYPE: &str = "foundationdb";
const ELIDED: &str = "[...]\n";

/// Body of `POST /api/v1/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatadogEvent {
    pub title: String,
    pub text: String,
    /// `normal` or `low`.
    pub priority: &'static str,
    pub tags: Vec<String>,
    pub alert_type: AlertType,
    pub source_type_name: &'static str,
}

impl DatadogEvent {
    /// Translate an event.
    ///
    /// The API has no `high` priority; such events go out as `normal` with a `priority:high`
    /// tag. Over-long bodies keep their tail, where the tool's final lines are.
    pub fn from_event(event: &NotificationEvent) -> Self {
        let mut tags: Vec<String> = event.tags.iter().map(str::to_string).collect();
        let priority = match event.priority {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => {
                tags.push("priority:high".to_string());
                "normal"
            }
        };
        Self {
            title: event.title.clone(),
            text: keep_tail(&event.body, MAX_TEXT_CHARS),
            priority,
            tags,
            alert_type: event.alert_type,
            source_type_name: SOURCE_TYPE,
        }
    }
}

fn keep_tail(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if total <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(ELIDED.len());
    let tail: String = text.chars().skip(total - keep).collect();
    format!("{ELIDED}{tail}")
}
