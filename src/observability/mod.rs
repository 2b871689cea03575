//! Observability for the view engine
//!
//! - Structured logging (JSON lines on stderr)
//! - Counters for commands and emitted views
//! - Begin/complete tracing for collection loads
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on view computation
//! 3. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use crossview::observability::{log_event_with_fields, Event, MetricsRegistry};
//!
//! log_event_with_fields(Event::FilterDropped, &[("field", "team")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_views_emitted();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

fn severity_for(event: Event) -> Severity {
    if event.is_warning() {
        Severity::Warn
    } else if event.is_chatty() {
        Severity::Trace
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_for(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_for_events() {
        assert_eq!(severity_for(Event::SortKeyReset), Severity::Warn);
        assert_eq!(severity_for(Event::ViewEmitted), Severity::Trace);
        assert_eq!(severity_for(Event::CollectionLoaded), Severity::Info);
    }

    #[test]
    fn test_log_event() {
        log_event(Event::SessionStart);
        log_event_with_fields(Event::ConfigLoaded, &[("path", "/tmp/view.json")]);
    }
}
