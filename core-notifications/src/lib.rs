//! # Notifications
//!
//! Best-effort wrapper over the host [`NotificationHost`](bridge_traits::NotificationHost)
//! and the push relay. Nothing here returns an error: failures are logged and
//! reported as `None`/`false`.

pub mod push;
pub mod service;

pub use push::{PushMessage, PushRelay};
pub use service::NotificationService;
