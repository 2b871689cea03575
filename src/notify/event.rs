//! Outbound events
//!
//! Serialized as `{"event": <name>, "payload": <body>}`, one JSON object per
//! message on the channel.

use serde::{Deserialize, Serialize};

use crate::view::{View, ViewError};

/// Event sent to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ViewEvent {
    /// A recomputed view after a successful state change
    ContentUpdated(View),
    /// A channel command failed validation; nothing changed
    CommandRejected { code: String, message: String },
}

impl ViewEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::ContentUpdated(_) => "contentUpdated",
            ViewEvent::CommandRejected { .. } => "commandRejected",
        }
    }

    /// Rejection reply for a failed command
    pub fn rejected(err: &ViewError) -> Self {
        ViewEvent::CommandRejected {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    /// The carried view, if any
    pub fn view(&self) -> Option<&View> {
        match self {
            ViewEvent::ContentUpdated(view) => Some(view),
            ViewEvent::CommandRejected { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SortDirection;
    use crate::view::{DebugInfo, ViewStatistics};
    use serde_json::json;

    fn empty_view() -> View {
        View {
            models: Vec::new(),
            statistics: ViewStatistics {
                total_pages: 1,
                total_models: 0,
                current_page: 1,
                visible_models: 0,
                per_page: 0,
                sort_key: "age".into(),
                sort_direction: SortDirection::Descending,
            },
            debug: DebugInfo { response_time: 0.25 },
        }
    }

    #[test]
    fn test_content_updated_wire_form() {
        let value = serde_json::to_value(ViewEvent::ContentUpdated(empty_view())).unwrap();
        assert_eq!(value["event"], "contentUpdated");
        assert_eq!(value["payload"]["models"], json!([]));
        assert_eq!(value["payload"]["statistics"]["sortDirection"], "descending");
        assert_eq!(value["payload"]["debug"]["responseTime"], 0.25);
    }

    #[test]
    fn test_rejected_wire_form() {
        let event = ViewEvent::rejected(&ViewError::UnknownDimension("height".into()));
        assert_eq!(event.name(), "commandRejected");
        assert!(event.view().is_none());

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "commandRejected",
                "payload": {
                    "code": "XV_UNKNOWN_DIMENSION",
                    "message": "Unknown dimension: height"
                }
            })
        );
    }
}
