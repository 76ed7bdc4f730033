//! Transient notices for the curio client.
//!
//! [`NotificationBus::publish`] pushes a [`Notice`] to every subscriber and
//! into a most-recent-first live list; each notice is removed again when its
//! own timer runs out.

mod bus;
mod notice;
mod status;

pub use bus::{NotificationBus, Subscriber, SubscriptionId};
pub use notice::{DEFAULT_DURATION, Notice, Notification, NotificationId};
pub use status::Status;
