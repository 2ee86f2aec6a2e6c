//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux), used for development builds and tests.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` (single attempt, fixed timeout)
//! - `SettingsStore` using a SQLite-backed key-value table
//! - `NotificationHost` using Tokio timers that log deliveries
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SqliteSettingsStore};
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let store = SqliteSettingsStore::in_data_dir().await?;
//!     // Inject into CoreConfig
//!     Ok(())
//! }
//! ```

mod http;
mod notification;
mod settings;

pub use http::{ReqwestHttpClient, DEFAULT_TIMEOUT};
pub use notification::DesktopNotificationHost;
pub use settings::SqliteSettingsStore;
