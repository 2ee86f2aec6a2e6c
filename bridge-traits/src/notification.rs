//! Local & Push Notification Abstraction
//!
//! Host notification capability: permissions, device push token, local
//! scheduling and the policy applied to notifications arriving while the app
//! is in the foreground.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;

/// Notification permission state reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// How a notification is presented when it arrives in the foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForegroundPresentation {
    pub show_alert: bool,
    pub play_sound: bool,
    pub set_badge: bool,
}

impl Default for ForegroundPresentation {
    fn default() -> Self {
        Self {
            show_alert: true,
            play_sound: true,
            set_badge: false,
        }
    }
}

/// A local notification to be delivered by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    /// Arbitrary JSON payload handed back to the app on tap
    #[serde(default)]
    pub data: serde_json::Value,
    /// Delay before delivery; `None` delivers immediately
    #[serde(default)]
    pub delay: Option<Duration>,
}

impl LocalNotification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: serde_json::Value::Null,
            delay: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Host notification capability
///
/// - iOS: UNUserNotificationCenter + APNs token
/// - Android: NotificationManager + FCM token
/// - Desktop: in-process timer that logs deliveries
#[async_trait]
pub trait NotificationHost: Send + Sync {
    /// Ask the user for permission (may show a system prompt)
    async fn request_permission(&self) -> Result<PermissionStatus>;

    /// Query the current permission without prompting
    async fn permission_status(&self) -> Result<PermissionStatus>;

    /// Device push token used by the push relay
    async fn device_push_token(&self) -> Result<String>;

    /// Schedule a local notification, returning its identifier
    async fn schedule(&self, notification: LocalNotification) -> Result<String>;

    /// Cancel a scheduled notification. Unknown identifiers are ignored.
    async fn cancel(&self, id: &str) -> Result<()>;

    /// Cancel every scheduled notification
    async fn cancel_all(&self) -> Result<()>;

    /// Set the foreground presentation policy
    async fn set_foreground_presentation(&self, presentation: ForegroundPresentation)
        -> Result<()>;
}
