//! Observable events
//!
//! Events are explicit and typed; their string form is the `event` field of
//! a log line.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Collection lifecycle
    /// Collection indexed and swapped in
    CollectionLoaded,
    /// A remembered filter lost its field on reload
    FilterDropped,
    /// The sort key lost its field on reload
    SortKeyReset,

    // Commands
    /// Command applied
    CommandApplied,
    /// Command rejected, state unchanged
    CommandRejected,

    // Views
    /// View recomputed and sent to subscribers
    ViewEmitted,
    /// A subscriber's channel was closed
    DeliveryFailed,

    // Subscribers
    /// Subscriber registered
    Subscribed,
    /// Subscriber removed
    Unsubscribed,

    // Session
    /// Session loop started
    SessionStart,
    /// Session loop drained and stopped
    SessionEnd,
    /// Configuration loaded
    ConfigLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::CollectionLoaded => "COLLECTION_LOADED",
            Event::FilterDropped => "FILTER_DROPPED",
            Event::SortKeyReset => "SORT_KEY_RESET",

            Event::CommandApplied => "COMMAND_APPLIED",
            Event::CommandRejected => "COMMAND_REJECTED",

            Event::ViewEmitted => "VIEW_EMITTED",
            Event::DeliveryFailed => "DELIVERY_FAILED",

            Event::Subscribed => "SUBSCRIBED",
            Event::Unsubscribed => "UNSUBSCRIBED",

            Event::SessionStart => "SESSION_START",
            Event::SessionEnd => "SESSION_END",
            Event::ConfigLoaded => "CONFIG_LOADED",
        }
    }

    /// Per-command events only show at TRACE
    pub fn is_chatty(&self) -> bool {
        matches!(self, Event::CommandApplied | Event::ViewEmitted)
    }

    /// Events that indicate something went missing
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::FilterDropped
                | Event::SortKeyReset
                | Event::CommandRejected
                | Event::DeliveryFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
