//! Identity provider abstraction and the identity toolkit REST client

use crate::error::{AuthError, Result};
use crate::types::{AuthUser, Session};
use async_trait::async_trait;
use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use chrono::Utc;
use core_runtime::config::IdentityConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// Email/password identity backend.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and signs it in
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Sets the display name of the account behind `id_token`
    async fn update_display_name(&self, id_token: &str, display_name: &str) -> Result<AuthUser>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    id_token: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    /// Seconds, sent as a string
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl From<SessionResponse> for Session {
    fn from(response: SessionResponse) -> Self {
        Session {
            user: AuthUser {
                uid: response.local_id,
                email: response.email,
                display_name: response.display_name.filter(|n| !n.is_empty()),
            },
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in.and_then(|s| s.parse().ok()),
            signed_in_at: Utc::now(),
        }
    }
}

/// Identity toolkit over HTTPS (`accounts:signUp`,
/// `accounts:signInWithPassword`, `accounts:update`).
pub struct RestIdentityProvider {
    http: Arc<dyn HttpClient>,
    base_url: String,
    api_key: String,
}

impl RestIdentityProvider {
    pub fn new(
        http: Arc<dyn HttpClient>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(http: Arc<dyn HttpClient>, config: &IdentityConfig) -> Self {
        Self::new(http, config.base_url.clone(), config.api_key.clone())
    }

    fn endpoint(&self, operation: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/accounts:{}", self.base_url, operation))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn call<B: Serialize + Sync>(&self, operation: &str, body: &B) -> Result<HttpResponse> {
        let request = HttpRequest::new(HttpMethod::Post, self.endpoint(operation)?.as_str())
            .json(body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        let response = self.http.execute(request).await?;
        if response.is_success() {
            debug!(operation, status = response.status, "Identity call succeeded");
            return Ok(response);
        }

        let raw = response
            .json::<ErrorEnvelope>()
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| format!("HTTP {}", response.status));
        warn!(operation, status = response.status, code = %raw, "Identity call rejected");
        Err(AuthError::provider(raw))
    }

    async fn password_call(&self, operation: &str, email: &str, password: &str) -> Result<Session> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: SessionResponse = self
            .call(operation, &body)
            .await?
            .json()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        Ok(response.into())
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    #[instrument(skip_all)]
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        self.password_call("signUp", email, password).await
    }

    #[instrument(skip_all)]
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        self.password_call("signInWithPassword", email, password)
            .await
    }

    #[instrument(skip_all)]
    async fn update_display_name(&self, id_token: &str, display_name: &str) -> Result<AuthUser> {
        let body = UpdateRequest {
            id_token,
            display_name,
            return_secure_token: false,
        };
        let response: UpdateResponse = self
            .call("update", &body)
            .await?
            .json()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        Ok(AuthUser {
            uid: response.local_id,
            email: response.email,
            display_name: response.display_name.filter(|n| !n.is_empty()),
        })
    }
}
