//! Notification service

use crate::push::{PushMessage, PushRelay};
use bridge_traits::{
    ForegroundPresentation, LocalNotification, NotificationHost, PermissionStatus,
};
use core_fleet::Moto;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Permission, push token, local scheduling and push sending.
///
/// Without a host (notifications disabled) every call is a logged no-op.
#[derive(Clone)]
pub struct NotificationService {
    host: Option<Arc<dyn NotificationHost>>,
    relay: PushRelay,
    push_token: Arc<RwLock<Option<String>>>,
}

impl NotificationService {
    pub fn new(host: Option<Arc<dyn NotificationHost>>, relay: PushRelay) -> Self {
        Self {
            host,
            relay,
            push_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.host.is_some()
    }

    fn host(&self) -> Option<&Arc<dyn NotificationHost>> {
        if self.host.is_none() {
            debug!("Notifications disabled, skipping");
        }
        self.host.as_ref()
    }

    /// Current permission without prompting
    pub async fn permission_status(&self) -> Option<PermissionStatus> {
        match self.host()?.permission_status().await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!(error = %e, "Failed to query notification permission");
                None
            }
        }
    }

    /// Prompts when needed. `true` only when permission ends up granted.
    #[instrument(skip(self))]
    pub async fn request_permission(&self) -> bool {
        let Some(host) = self.host() else {
            return false;
        };

        if let Some(PermissionStatus::Granted) = self.permission_status().await {
            return true;
        }

        match host.request_permission().await {
            Ok(status) => {
                info!(?status, "Notification permission answered");
                status.is_granted()
            }
            Err(e) => {
                warn!(error = %e, "Failed to request notification permission");
                false
            }
        }
    }

    /// Asks for permission and fetches the device push token, caching it.
    #[instrument(skip(self))]
    pub async fn register_for_push(&self) -> Option<String> {
        if !self.request_permission().await {
            warn!("Push registration skipped: permission not granted");
            return None;
        }

        match self.host()?.device_push_token().await {
            Ok(token) => {
                debug!("Obtained device push token");
                *self.push_token.write().await = Some(token.clone());
                Some(token)
            }
            Err(e) => {
                warn!(error = %e, "Failed to obtain device push token");
                None
            }
        }
    }

    /// Token from the last successful registration
    pub async fn push_token(&self) -> Option<String> {
        self.push_token.read().await.clone()
    }

    pub async fn schedule(&self, notification: LocalNotification) -> Option<String> {
        let title = notification.title.clone();
        match self.host()?.schedule(notification).await {
            Ok(id) => {
                debug!(%id, %title, "Scheduled local notification");
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, %title, "Failed to schedule notification");
                None
            }
        }
    }

    pub async fn cancel(&self, id: &str) -> bool {
        let Some(host) = self.host() else {
            return false;
        };
        match host.cancel(id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, id, "Failed to cancel notification");
                false
            }
        }
    }

    pub async fn cancel_all(&self) -> bool {
        let Some(host) = self.host() else {
            return false;
        };
        match host.cancel_all().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to cancel notifications");
                false
            }
        }
    }

    /// Sets how notifications show while the app is open.
    pub async fn configure_foreground(&self, presentation: ForegroundPresentation) -> bool {
        let Some(host) = self.host() else {
            return false;
        };
        match host.set_foreground_presentation(presentation).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Failed to set foreground presentation");
                false
            }
        }
    }

    /// Sends through the push relay to `to`, or to this device's cached
    /// token when `to` is `None`.
    #[instrument(skip(self, body, data))]
    pub async fn send_push(
        &self,
        to: Option<&str>,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> bool {
        let to = match to {
            Some(to) => to.to_string(),
            None => match self.push_token().await {
                Some(token) => token,
                None => {
                    warn!("No push token registered");
                    return false;
                }
            },
        };

        let message = PushMessage::new(to, title, body).with_data(data);
        self.relay.send(&message).await
    }

    /// Local notification for the notification test screen.
    pub async fn schedule_test_notification(&self, delay: Duration) -> Option<String> {
        let notification = LocalNotification::new(
            "Notificação de teste",
            format!(
                "Esta notificação foi agendada para {} segundos.",
                delay.as_secs()
            ),
        )
        .with_data(json!({ "type": "test" }))
        .after(delay);

        self.schedule(notification).await
    }

    /// Announces a newly registered motorcycle. Never blocks the caller on
    /// failure.
    pub async fn notify_moto_registered(&self, moto: &Moto) -> Option<String> {
        let notification = LocalNotification::new(
            "Moto cadastrada",
            format!("A moto {} ({}) foi cadastrada com sucesso.", moto.placa, moto.modelo),
        )
        .with_data(json!({
            "type": "moto_registered",
            "motoId": moto.id,
            "placa": moto.placa,
        }));

        self.schedule(notification).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::{HttpClient, HttpRequest, HttpResponse};
    use bytes::Bytes;
    use core_fleet::MotoStatus;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        Host {}

        #[async_trait]
        impl NotificationHost for Host {
            async fn request_permission(&self) -> BridgeResult<PermissionStatus>;
            async fn permission_status(&self) -> BridgeResult<PermissionStatus>;
            async fn device_push_token(&self) -> BridgeResult<String>;
            async fn schedule(&self, notification: LocalNotification) -> BridgeResult<String>;
            async fn cancel(&self, id: &str) -> BridgeResult<()>;
            async fn cancel_all(&self) -> BridgeResult<()>;
            async fn set_foreground_presentation(&self, presentation: ForegroundPresentation) -> BridgeResult<()>;
        }
    }

    mock! {
        Http {}

        #[async_trait]
        impl HttpClient for Http {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn is_connected(&self) -> bool;
        }
    }

    fn relay(http: MockHttp) -> PushRelay {
        PushRelay::new(Arc::new(http), "https://relay.test/push", Duration::from_secs(10))
    }

    fn service(host: MockHost, http: MockHttp) -> NotificationService {
        NotificationService::new(Some(Arc::new(host)), relay(http))
    }

    fn moto() -> Moto {
        Moto {
            id: "m-1".to_string(),
            placa: "ABC1D23".to_string(),
            modelo: "Mottu-E".to_string(),
            ano: 2024,
            cor: "Preta".to_string(),
            filial_id: "7".to_string(),
            status: MotoStatus::Disponivel,
            vaga: None,
            condutor: None,
            latitude: None,
            longitude: None,
        }
    }

    #[tokio::test]
    async fn test_disabled_service_is_inert() {
        let mut http = MockHttp::new();
        http.expect_execute().never();
        let service = NotificationService::new(None, relay(http));

        assert!(!service.is_enabled());
        assert!(!service.request_permission().await);
        assert!(service.register_for_push().await.is_none());
        assert!(service.schedule_test_notification(Duration::from_secs(5)).await.is_none());
        assert!(!service.cancel_all().await);
        assert!(!service.send_push(None, "t", "b", json!({})).await);
    }

    #[tokio::test]
    async fn test_register_prompts_only_when_needed() {
        let mut host = MockHost::new();
        host.expect_permission_status()
            .times(1)
            .returning(|| Ok(PermissionStatus::Undetermined));
        host.expect_request_permission()
            .times(1)
            .returning(|| Ok(PermissionStatus::Granted));
        host.expect_device_push_token()
            .times(1)
            .returning(|| Ok("ExponentPushToken[xyz]".to_string()));

        let service = service(host, MockHttp::new());
        assert_eq!(
            service.register_for_push().await.as_deref(),
            Some("ExponentPushToken[xyz]")
        );
        assert_eq!(
            service.push_token().await.as_deref(),
            Some("ExponentPushToken[xyz]")
        );
    }

    #[tokio::test]
    async fn test_denied_permission_skips_token() {
        let mut host = MockHost::new();
        host.expect_permission_status()
            .returning(|| Ok(PermissionStatus::Denied));
        host.expect_request_permission()
            .returning(|| Ok(PermissionStatus::Denied));
        host.expect_device_push_token().never();

        let service = service(host, MockHttp::new());
        assert!(service.register_for_push().await.is_none());
    }

    #[tokio::test]
    async fn test_schedule_test_notification_uses_delay() {
        let mut host = MockHost::new();
        host.expect_schedule()
            .withf(|n| n.delay == Some(Duration::from_secs(5)) && n.data["type"] == "test")
            .times(1)
            .returning(|_| Ok("n-1".to_string()));

        let service = service(host, MockHttp::new());
        assert_eq!(
            service
                .schedule_test_notification(Duration::from_secs(5))
                .await
                .as_deref(),
            Some("n-1")
        );
    }

    #[tokio::test]
    async fn test_moto_notification_failure_is_swallowed() {
        let mut host = MockHost::new();
        host.expect_schedule()
            .withf(|n| n.body.contains("ABC1D23") && n.delay.is_none())
            .times(1)
            .returning(|_| Err(BridgeError::NotAvailable("notifications".to_string())));

        let service = service(host, MockHttp::new());
        assert!(service.notify_moto_registered(&moto()).await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_and_foreground_policy() {
        let mut host = MockHost::new();
        host.expect_cancel()
            .withf(|id| id == "n-1")
            .returning(|_| Ok(()));
        host.expect_set_foreground_presentation()
            .withf(|p| p.show_alert && p.play_sound && !p.set_badge)
            .returning(|_| Ok(()));

        let service = service(host, MockHttp::new());
        assert!(service.cancel("n-1").await);
        assert!(
            service
                .configure_foreground(ForegroundPresentation::default())
                .await
        );
    }

    #[tokio::test]
    async fn test_send_push_to_own_token() {
        let mut host = MockHost::new();
        host.expect_permission_status()
            .returning(|| Ok(PermissionStatus::Granted));
        host.expect_device_push_token()
            .returning(|| Ok("tok-1".to_string()));

        let mut http = MockHttp::new();
        http.expect_execute()
            .withf(|req| {
                let body: serde_json::Value =
                    serde_json::from_slice(req.body.as_deref().unwrap_or_default()).unwrap();
                body["to"] == "tok-1" && body["priority"] == "high"
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse {
                    status: 200,
                    headers: HashMap::new(),
                    body: Bytes::new(),
                })
            });

        let service = service(host, http);
        assert!(!service.send_push(None, "t", "b", json!({})).await);
        service.register_for_push().await;
        assert!(service.send_push(None, "Olá", "Teste", json!({})).await);
    }
}
