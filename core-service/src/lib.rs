//! Core service façade and bootstrap helpers.
//!
//! This crate wires the bridges and settings of a [`CoreConfig`] into every
//! fleet service: local store, preferences, REST clients, authentication and
//! notifications. Desktop apps typically enable the `desktop-shims` feature,
//! which lets [`CoreService::desktop`] start from the `bridge-desktop`
//! adapters. Mobile hosts build a `CoreConfig` with their own bridges.

pub mod error;

pub use error::{CoreError, Result};

use core_api::{ApiClient, FilialService, MotoService};
use core_auth::{AuthManager, AuthUser, RestIdentityProvider};
use core_fleet::{Moto, MotoForm};
use core_notifications::{NotificationService, PushRelay};
use core_runtime::build_info::BuildInfo;
use core_runtime::config::{CoreConfig, FeatureFlags};
use core_runtime::events::{CoreEvent, EventBus, YardEvent};
use core_storage::{LocalStore, Preferences};
use bridge_traits::ForegroundPresentation;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Capacity of the event broadcast channel
const EVENT_BUS_CAPACITY: usize = 100;

/// What [`CoreService::bootstrap`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapReport {
    /// `(vagas, motos)` written by first-run seeding
    pub seeded: Option<(usize, usize)>,
    /// Identity to greet before the provider answers
    pub restored_user: Option<AuthUser>,
    pub push_token: Option<String>,
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    store: LocalStore,
    preferences: Preferences,
    motos: MotoService,
    filiais: FilialService,
    auth: Arc<AuthManager>,
    notifications: NotificationService,
    events: EventBus,
    build_info: BuildInfo,
    features: FeatureFlags,
}

impl CoreService {
    /// Wires every service from a validated configuration.
    pub fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;
        let events = EventBus::new(EVENT_BUS_CAPACITY);

        let api = ApiClient::from_config(config.http_client.clone(), &config.api)?;
        let identity = RestIdentityProvider::from_config(config.http_client.clone(), &config.identity);
        let relay = PushRelay::new(
            config.http_client.clone(),
            config.push_relay_url.clone(),
            config.api.timeout,
        );
        let notification_host = if config.features.enable_notifications {
            config.notification_host.clone()
        } else {
            None
        };

        let service = Self {
            store: LocalStore::new(config.settings_store.clone()),
            preferences: Preferences::new(config.settings_store.clone()),
            motos: MotoService::new(api.clone()),
            filiais: FilialService::new(api),
            auth: Arc::new(AuthManager::new(
                Arc::new(identity),
                config.settings_store.clone(),
                events.clone(),
            )),
            notifications: NotificationService::new(notification_host, relay),
            events,
            build_info: BuildInfo::resolve(config.build_info_json.as_deref()),
            features: config.features,
        };

        info!(
            api = %config.api.base_url(),
            build_type = %service.build_info.build_type,
            commit = service.build_info.short_commit().unwrap_or("unknown"),
            "Core service created"
        );
        Ok(service)
    }

    /// Desktop setup: `bridge-desktop` adapters and default settings.
    #[cfg(feature = "desktop-shims")]
    pub fn desktop(identity_api_key: impl Into<String>) -> Result<Self> {
        let config = CoreConfig::builder()
            .identity_api_key(identity_api_key)
            .build()?;
        Self::new(config)
    }

    /// First-start work: seeds the yard when enabled, restores the mirrored
    /// identity and, with notifications on, applies the foreground policy and
    /// registers for push.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        if self.features.seed_mock_data {
            if let Some(yard) = self.store.initialize_mock_data().await {
                let counts = (yard.vagas.len(), yard.motos.len());
                let _ = self.events.emit(CoreEvent::Yard(YardEvent::MockDataSeeded {
                    vagas: counts.0,
                    motos: counts.1,
                }));
                report.seeded = Some(counts);
            }
        }

        report.restored_user = self.auth.restore_session().await;

        if self.notifications.is_enabled() {
            self.notifications
                .configure_foreground(ForegroundPresentation::default())
                .await;
            report.push_token = self.notifications.register_for_push().await;
        }

        debug!(seeded = ?report.seeded, restored = report.restored_user.is_some(), "Bootstrap finished");
        report
    }

    /// Creates the motorcycle remotely, then announces it locally.
    ///
    /// The announcement is best-effort and never fails the registration.
    pub async fn register_moto(&self, form: &MotoForm) -> Result<Moto> {
        let moto = self.motos.create(form).await?;
        self.notifications.notify_moto_registered(&moto).await;
        Ok(moto)
    }

    /// Drops the yard collections. Preferences and the auth mirror stay.
    pub async fn clear_local_data(&self) {
        self.store.clear_all().await;
        let _ = self.events.emit(CoreEvent::Yard(YardEvent::LocalDataCleared));
        info!("Local yard data cleared");
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn motos(&self) -> &MotoService {
        &self.motos
    }

    pub fn filiais(&self) -> &FilialService {
        &self.filiais
    }

    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn build_info(&self) -> &BuildInfo {
        &self.build_info
    }
}
