//! # Core Configuration Module
//!
//! Provides configuration management for the Fleet Yard core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds every bridge and setting the services need. It enforces
//! fail-fast validation so a misconfigured core never starts.
//!
//! ## Required Settings
//!
//! - Identity provider API key (`identity_api_key`)
//! - `HttpClient` and `SettingsStore` bridges (desktop defaults available)
//!
//! ## Optional Settings
//!
//! - `ApiEnvironment` / explicit base URL (default: Android emulator host)
//! - Request timeout (default: 10 s)
//! - `NotificationHost` (required only when notifications are enabled)
//! - Push relay URL, settings database path, runtime build info JSON
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults for
//! `HttpClient`, `SettingsStore` and `NotificationHost` are injected
//! automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{ApiEnvironment, CoreConfig};
//!
//! let config = CoreConfig::builder()
//!     .api_environment(ApiEnvironment::Lan { host: "192.168.0.12".into() })
//!     .identity_api_key("AIza...")
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // Missing identity key
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing identity API key");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{HttpClient, NotificationHost, SettingsStore};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Port the fleet REST API listens on in every development environment
pub const DEFAULT_API_PORT: u16 = 5000;

/// Fixed request timeout for the REST API
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound accepted by [`CoreConfig::validate`]
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Static key sent as `X-Api-Key` on every API request
pub const DEFAULT_API_KEY: &str = "fleet-yard-dev-key";

/// Push relay endpoint
pub const DEFAULT_PUSH_RELAY_URL: &str = "https://exp.host/--/api/v2/push/send";

/// Identity toolkit REST base
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Where the app is running relative to the API host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiEnvironment {
    /// Android emulator, host loopback is `10.0.2.2`
    AndroidEmulator,
    /// iOS simulator, host loopback is `localhost`
    IosSimulator,
    /// Physical device on the same network as the API host
    Lan { host: String },
    /// Fully custom base URL
    Custom { base_url: String },
}

impl Default for ApiEnvironment {
    fn default() -> Self {
        Self::AndroidEmulator
    }
}

impl ApiEnvironment {
    pub fn base_url(&self) -> String {
        match self {
            Self::AndroidEmulator => format!("http://10.0.2.2:{}/api", DEFAULT_API_PORT),
            Self::IosSimulator => format!("http://localhost:{}/api", DEFAULT_API_PORT),
            Self::Lan { host } => format!("http://{}:{}/api", host, DEFAULT_API_PORT),
            Self::Custom { base_url } => base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// REST API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub environment: ApiEnvironment,
    pub timeout: Duration,
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: ApiEnvironment::default(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn base_url(&self) -> String {
        self.environment.base_url()
    }
}

/// Identity provider settings.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub api_key: String,
    pub base_url: String,
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Feature flags control optional functionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Seed the yard map with synthetic slots on first start
    pub seed_mock_data: bool,

    /// Enable local/push notifications (requires NotificationHost)
    pub enable_notifications: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            seed_mock_data: true,
            enable_notifications: false,
        }
    }
}

/// Core configuration for the Fleet Yard core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    pub api: ApiConfig,
    pub identity: IdentityConfig,
    pub push_relay_url: String,

    /// Location of the settings database, `None` for the platform default
    pub storage_path: Option<PathBuf>,

    /// Runtime-injected build metadata JSON, highest priority source
    pub build_info_json: Option<String>,

    pub http_client: Arc<dyn HttpClient>,
    pub settings_store: Arc<dyn SettingsStore>,
    pub notification_host: Option<Arc<dyn NotificationHost>>,

    pub features: FeatureFlags,
}

impl fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api", &self.api)
            .field("identity", &self.identity)
            .field("push_relay_url", &self.push_relay_url)
            .field("storage_path", &self.storage_path)
            .field("build_info_json", &self.build_info_json.is_some())
            .field("http_client", &"HttpClient { ... }")
            .field("settings_store", &"SettingsStore { ... }")
            .field(
                "notification_host",
                &self
                    .notification_host
                    .as_ref()
                    .map(|_| "NotificationHost { ... }"),
            )
            .field("features", &self.features)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Base URLs parse as absolute http(s) URLs
    /// - Timeout is within (0, 120 s]
    /// - API and identity keys are not empty
    /// - Notifications are only enabled with a `NotificationHost`
    pub fn validate(&self) -> Result<()> {
        validate_url("API base URL", &self.api.base_url())?;
        validate_url("Identity base URL", &self.identity.base_url)?;
        validate_url("Push relay URL", &self.push_relay_url)?;

        if self.api.timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.api.timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(format!(
                "Request timeout exceeds maximum of {} seconds",
                MAX_REQUEST_TIMEOUT.as_secs()
            )));
        }

        if self.api.api_key.trim().is_empty() {
            return Err(Error::Config("API key cannot be empty".to_string()));
        }

        if self.identity.api_key.trim().is_empty() {
            return Err(Error::Config(
                "Identity API key cannot be empty".to_string(),
            ));
        }

        if self.features.enable_notifications && self.notification_host.is_none() {
            return Err(Error::Config(
                "Notifications enabled but no NotificationHost provided. \
                 Disable the feature or inject a NotificationHost implementation."
                    .to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_url(label: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| Error::Config(format!("{} '{}' is invalid: {}", label, value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "{} must use http or https, got '{}'",
            label, other
        ))),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for the fleet API. \
                 Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
                 Mobile: inject the platform HTTP stack."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required for local collections. \
                 Desktop: enable the 'desktop-shims' feature to use the default SqliteSettingsStore. \
                 Mobile: inject platform-native key-value storage."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to initialize default HttpClient: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_settings_store(
    storage_path: Option<&PathBuf>,
) -> Result<Arc<dyn SettingsStore>> {
    use bridge_desktop::SqliteSettingsStore;

    let path = match storage_path {
        Some(path) => path.clone(),
        None => SqliteSettingsStore::default_path().map_err(|e| {
            Error::Internal(format!("Failed to resolve default storage path: {}", e))
        })?,
    };

    let store = SqliteSettingsStore::open_lazy(&path).map_err(|e| {
        Error::Internal(format!("Failed to initialize default SettingsStore: {}", e))
    })?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_settings_store(
    _storage_path: Option<&PathBuf>,
) -> Result<Arc<dyn SettingsStore>> {
    Err(settings_store_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_notification_host() -> Option<Arc<dyn NotificationHost>> {
    Some(Arc::new(bridge_desktop::DesktopNotificationHost::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_notification_host() -> Option<Arc<dyn NotificationHost>> {
    None
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Call [`build()`](CoreConfigBuilder::build) to validate and create the
/// final config. Missing required values produce actionable error messages.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_environment: Option<ApiEnvironment>,
    request_timeout: Option<Duration>,
    api_key: Option<String>,
    identity_api_key: Option<String>,
    identity_base_url: Option<String>,
    push_relay_url: Option<String>,
    storage_path: Option<PathBuf>,
    build_info_json: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    notification_host: Option<Arc<dyn NotificationHost>>,
    features: FeatureFlags,
}

impl CoreConfigBuilder {
    /// Sets where the app runs relative to the API host.
    ///
    /// Default: [`ApiEnvironment::AndroidEmulator`]
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::{ApiEnvironment, CoreConfig};
    ///
    /// let builder = CoreConfig::builder()
    ///     .api_environment(ApiEnvironment::IosSimulator);
    /// ```
    pub fn api_environment(mut self, environment: ApiEnvironment) -> Self {
        self.api_environment = Some(environment);
        self
    }

    /// Overrides the API base URL. Shorthand for `ApiEnvironment::Custom`.
    pub fn api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_environment = Some(ApiEnvironment::Custom {
            base_url: base_url.into(),
        });
        self
    }

    /// Sets the request timeout.
    ///
    /// Default: 10 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the static `X-Api-Key` header value.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the identity provider API key (required).
    pub fn identity_api_key(mut self, key: impl Into<String>) -> Self {
        self.identity_api_key = Some(key.into());
        self
    }

    /// Overrides the identity toolkit base URL.
    pub fn identity_base_url(mut self, url: impl Into<String>) -> Self {
        self.identity_base_url = Some(url.into());
        self
    }

    /// Overrides the push relay endpoint.
    pub fn push_relay_url(mut self, url: impl Into<String>) -> Self {
        self.push_relay_url = Some(url.into());
        self
    }

    /// Sets the settings database path used by the desktop default store.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .storage_path("/tmp/fleet/storage.db");
    /// ```
    pub fn storage_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Injects build metadata JSON known only at runtime.
    pub fn build_info_json(mut self, json: impl Into<String>) -> Self {
        self.build_info_json = Some(json.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the settings store implementation.
    ///
    /// If not provided, the desktop default (SQLite-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Sets the notification host implementation.
    pub fn notification_host(mut self, host: Arc<dyn NotificationHost>) -> Self {
        self.notification_host = Some(host);
        self
    }

    /// Enables or disables mock yard seeding.
    ///
    /// Default: true
    pub fn seed_mock_data(mut self, enabled: bool) -> Self {
        self.features.seed_mock_data = enabled;
        self
    }

    /// Enables or disables notifications.
    ///
    /// Requires a `NotificationHost` to be provided (or desktop shims).
    ///
    /// Default: false
    pub fn enable_notifications(mut self, enabled: bool) -> Self {
        self.features.enable_notifications = enabled;
        self
    }

    /// Sets all feature flags at once.
    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns an error if:
    /// - The identity API key is missing
    /// - Required bridges are missing (HttpClient, SettingsStore)
    /// - Configuration values are invalid
    /// - Feature flags are inconsistent with available bridges
    pub fn build(self) -> Result<CoreConfig> {
        let identity_api_key = self.identity_api_key.ok_or_else(|| {
            Error::Config(
                "Identity API key is required. Use .identity_api_key() to set it.".to_string(),
            )
        })?;

        let api = ApiConfig {
            environment: self.api_environment.unwrap_or_default(),
            timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            api_key: self.api_key.unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
        };

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(api.timeout)?,
        };

        let settings_store = match self.settings_store {
            Some(store) => store,
            None => provide_default_settings_store(self.storage_path.as_ref())?,
        };

        let notification_host = self
            .notification_host
            .or_else(provide_default_notification_host);

        let config = CoreConfig {
            api,
            identity: IdentityConfig {
                api_key: identity_api_key,
                base_url: self
                    .identity_base_url
                    .unwrap_or_else(|| DEFAULT_IDENTITY_BASE_URL.to_string()),
            },
            push_relay_url: self
                .push_relay_url
                .unwrap_or_else(|| DEFAULT_PUSH_RELAY_URL.to_string()),
            storage_path: self.storage_path,
            build_info_json: self.build_info_json,
            http_client,
            settings_store,
            notification_host,
            features: self.features,
        };

        config.validate()?;

        Ok(config)
    }
}
