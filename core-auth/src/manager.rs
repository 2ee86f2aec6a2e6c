//! # Authentication Manager
//!
//! Email/password sessions on top of an [`IdentityProvider`].
//!
//! ## Overview
//!
//! The manager keeps the live [`Session`] in memory and mirrors the signed-in
//! [`AuthUser`] into the settings store under `@auth_user`, so the app can
//! greet the previous operator before the provider answers. Every state
//! change is broadcast on the [`EventBus`] as an [`AuthEvent`].
//!
//! Tokens are never persisted and never refreshed: a restored identity is
//! display-only until the next sign-in.
//!
//! ## Usage
//!
//! ```ignore
//! let manager = AuthManager::new(provider, settings_store, event_bus);
//! let user = manager.sign_in("ana@frota.com", "segredo").await?;
//! manager.update_profile("Ana Souza").await?;
//! manager.sign_out().await;
//! ```

use crate::error::{AuthError, Result};
use crate::provider::IdentityProvider;
use crate::types::{AuthUser, Session};
use bridge_traits::SettingsStore;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus};
use core_runtime::logging::redact_if_sensitive;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Settings key of the mirrored identity
pub const AUTH_USER_KEY: &str = "@auth_user";

pub struct AuthManager {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn SettingsStore>,
    event_bus: EventBus,
    session: Arc<RwLock<Option<Session>>>,
}

impl AuthManager {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: Arc<dyn SettingsStore>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            provider,
            store,
            event_bus,
            session: Arc::new(RwLock::new(None)),
        }
    }

    fn emit(&self, event: AuthEvent) {
        // No subscribers is fine
        let _ = self.event_bus.emit(CoreEvent::Auth(event));
    }

    fn report(&self, error: AuthError) -> AuthError {
        let code = error.code();
        warn!(code = code.key(), error = %error, "Authentication failed");
        self.emit(AuthEvent::AuthError {
            code: code.key().to_string(),
            message: code.message().to_string(),
        });
        error
    }

    async fn mirror(&self, user: &AuthUser) {
        let json = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to encode auth user");
                return;
            }
        };
        if let Err(e) = self.store.set_string(AUTH_USER_KEY, &json).await {
            warn!(error = %e, "Failed to mirror auth user");
        }
    }

    async fn start_session(&self, session: Session) -> AuthUser {
        let user = session.user.clone();
        *self.session.write().await = Some(session);
        self.mirror(&user).await;

        info!(uid = %user.uid, email = %redact_if_sensitive("email", &user.email), "Signed in");
        self.emit(AuthEvent::SignedIn {
            uid: user.uid.clone(),
            email: redact_if_sensitive("email", &user.email),
        });
        user
    }

    /// Creates the account, signs it in and optionally sets a display name.
    ///
    /// A failed display-name update does not undo the registration; the
    /// returned user then has no name.
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<AuthUser> {
        let mut session = self
            .provider
            .sign_up(email.trim(), password)
            .await
            .map_err(|e| self.report(e))?;

        if let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty()) {
            match self.provider.update_display_name(&session.id_token, name).await {
                Ok(updated) => session.user.display_name = updated.display_name,
                Err(e) => warn!(error = %e, "Registered without display name"),
            }
        }

        Ok(self.start_session(session).await)
    }

    #[instrument(skip_all)]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let session = self
            .provider
            .sign_in_with_password(email.trim(), password)
            .await
            .map_err(|e| self.report(e))?;
        Ok(self.start_session(session).await)
    }

    /// Ends the session and clears the mirror. Never fails.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) {
        let previous = self.session.write().await.take();
        if let Err(e) = self.store.delete(AUTH_USER_KEY).await {
            warn!(error = %e, "Failed to clear mirrored auth user");
        }

        let uid = previous.map(|s| s.user.uid);
        info!(uid = ?uid, "Signed out");
        self.emit(AuthEvent::SignedOut { uid });
    }

    /// Changes the display name of the signed-in user.
    #[instrument(skip(self))]
    pub async fn update_profile(&self, display_name: &str) -> Result<AuthUser> {
        let id_token = match self.session.read().await.as_ref() {
            Some(session) => session.id_token.clone(),
            None => return Err(self.report(AuthError::NotAuthenticated)),
        };

        let updated = self
            .provider
            .update_display_name(&id_token, display_name.trim())
            .await
            .map_err(|e| self.report(e))?;

        let user = {
            let mut guard = self.session.write().await;
            let session = guard.as_mut().ok_or(AuthError::NotAuthenticated)?;
            session.user.display_name = updated.display_name;
            session.user.clone()
        };
        self.mirror(&user).await;

        self.emit(AuthEvent::ProfileUpdated {
            uid: user.uid.clone(),
            display_name: user.display_name.clone(),
        });
        Ok(user)
    }

    /// User of the live session
    pub async fn current_user(&self) -> Option<AuthUser> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_signed_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Last mirrored identity; `None` when missing or unreadable.
    pub async fn cached_user(&self) -> Option<AuthUser> {
        let raw = match self.store.get_string(AUTH_USER_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Failed to read mirrored auth user");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Discarding corrupted auth user mirror");
                None
            }
        }
    }

    /// Identity to show at startup: the live user if any, else the mirror.
    #[instrument(skip(self))]
    pub async fn restore_session(&self) -> Option<AuthUser> {
        if let Some(user) = self.current_user().await {
            return Some(user);
        }
        let cached = self.cached_user().await;
        match &cached {
            Some(user) => debug!(uid = %user.uid, "Restored mirrored identity"),
            None => debug!("No identity to restore"),
        }
        cached
    }
}
