//! Notification host for desktop
//!
//! Desktop builds have no OS push channel. Local notifications are kept in an
//! in-process schedule and "delivered" by logging them when their delay elapses.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    notification::{
        ForegroundPresentation, LocalNotification, NotificationHost, PermissionStatus,
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Tokio-timer notification host.
///
/// Permission is always granted. There is no device push token on desktop, so
/// `device_push_token` reports `NotAvailable`.
#[derive(Default)]
pub struct DesktopNotificationHost {
    scheduled: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
    presentation: Mutex<ForegroundPresentation>,
}

impl DesktopNotificationHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers of notifications that have not been delivered or cancelled yet
    pub async fn pending_ids(&self) -> Vec<String> {
        let scheduled = self.scheduled.lock().await;
        let mut ids: Vec<String> = scheduled
            .iter()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Current foreground presentation policy
    pub async fn presentation(&self) -> ForegroundPresentation {
        *self.presentation.lock().await
    }
}

#[async_trait]
impl NotificationHost for DesktopNotificationHost {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn permission_status(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn device_push_token(&self) -> Result<String> {
        Err(BridgeError::NotAvailable(
            "Push tokens are not available on desktop".to_string(),
        ))
    }

    async fn schedule(&self, notification: LocalNotification) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let delay = notification.delay.unwrap_or_default();
        let scheduled = Arc::clone(&self.scheduled);
        let task_id = id.clone();

        debug!(id = %id, delay_ms = delay.as_millis() as u64, "Scheduling local notification");

        // Held across the spawn so the task's own removal always runs after the insert
        let mut pending = self.scheduled.lock().await;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!(
                id = %task_id,
                title = %notification.title,
                body = %notification.body,
                "Delivering local notification"
            );
            scheduled.lock().await.remove(&task_id);
        });

        pending.insert(id.clone(), handle);
        Ok(id)
    }

    async fn cancel(&self, id: &str) -> Result<()> {
        if let Some(handle) = self.scheduled.lock().await.remove(id) {
            handle.abort();
            debug!(id = id, "Cancelled local notification");
        }
        Ok(())
    }

    async fn cancel_all(&self) -> Result<()> {
        let mut scheduled = self.scheduled.lock().await;
        for (_, handle) in scheduled.drain() {
            handle.abort();
        }
        debug!("Cancelled all local notifications");
        Ok(())
    }

    async fn set_foreground_presentation(
        &self,
        presentation: ForegroundPresentation,
    ) -> Result<()> {
        *self.presentation.lock().await = presentation;
        Ok(())
    }
}
