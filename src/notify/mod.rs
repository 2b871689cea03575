//! Subscriber notification
//!
//! The controller owns a [`SubscriberRegistry`] and pushes a
//! [`ViewEvent::ContentUpdated`] to every subscriber after each successful
//! state change.

mod event;
mod subscriber;

pub use event::ViewEvent;
pub use subscriber::{
    ChannelSubscriber, DispatchResult, EventReceiver, EventSender, Subscriber,
    SubscriberRegistry, SubscriptionId,
};
