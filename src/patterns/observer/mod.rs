//! Notifications, observers and the notifier capability.

pub mod notification;
pub mod notifier;
pub mod observer;

pub use notification::Notification;
pub use notifier::{HasNotifier, Notifier};
pub use observer::Observer;
