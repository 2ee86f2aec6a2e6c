//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the fleet core and platform-specific
//! implementations. Each trait represents a capability the core requires but
//! that is implemented differently per platform (desktop, iOS, Android).
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP, one attempt per request
//!
//! ### Storage
//! - [`SettingsStore`](storage::SettingsStore) - Persistent string key-value storage
//!
//! ### Notifications
//! - [`NotificationHost`](notification::NotificationHost) - Permissions, push token,
//!   local scheduling
//!
//! ### Logging
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! | iOS      | host app            | 📋 Injected by host |
//! | Android  | host app            | 📋 Injected by host |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors to `BridgeError` with actionable messages.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so they can be shared through `Arc`
//! across async tasks.

pub mod error;
pub mod http;
pub mod logging;
pub mod notification;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use notification::{
    ForegroundPresentation, LocalNotification, NotificationHost, PermissionStatus,
};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::SettingsStore;
