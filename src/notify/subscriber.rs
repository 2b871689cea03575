//! Subscriber registration and fan-out
//!
//! Delivery is synchronous and in registration order. Channel sends never
//! block; a subscriber whose receiver is gone counts as a failed delivery
//! and stays registered until it is explicitly removed.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::event::ViewEvent;

/// Event sender for a channel subscriber
pub type EventSender = mpsc::UnboundedSender<ViewEvent>;

/// Event receiver for a channel subscriber
pub type EventReceiver = mpsc::UnboundedReceiver<ViewEvent>;

/// Receives every event the controller emits
pub trait Subscriber: Send {
    /// Deliver one event; `false` if the subscriber is no longer reachable
    fn deliver(&self, event: &ViewEvent) -> bool;
}

impl<F> Subscriber for F
where
    F: Fn(&ViewEvent) + Send,
{
    fn deliver(&self, event: &ViewEvent) -> bool {
        self(event);
        true
    }
}

/// Subscriber backed by a tokio unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSubscriber {
    sender: EventSender,
}

impl ChannelSubscriber {
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }

    /// Create a subscriber together with its receiving end
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Subscriber for ChannelSubscriber {
    fn deliver(&self, event: &ViewEvent) -> bool {
        self.sender.send(event.clone()).is_ok()
    }
}

/// Handle returned by [`SubscriberRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of dispatching an event
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// Number of events delivered
    pub delivered: usize,
    /// Number of failed deliveries
    pub failed: usize,
}

/// Registered subscribers, in registration order
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: Vec<(SubscriptionId, Box<dyn Subscriber>)>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber
    pub fn subscribe<S>(&mut self, subscriber: S) -> SubscriptionId
    where
        S: Subscriber + 'static,
    {
        let id = SubscriptionId::new();
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber; returns false if the id is unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver `event` to every subscriber
    pub fn dispatch(&self, event: &ViewEvent) -> DispatchResult {
        let mut result = DispatchResult::default();
        for (_, subscriber) in &self.subscribers {
            if subscriber.deliver(event) {
                result.delivered += 1;
            } else {
                result.failed += 1;
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
