//! Push relay client

use bridge_traits::{HttpClient, HttpMethod, HttpRequest};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Body accepted by the push relay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    /// Device push token
    pub to: String,
    pub title: String,
    pub body: String,
    pub data: serde_json::Value,
    pub priority: &'static str,
    pub sound: &'static str,
}

impl PushMessage {
    pub fn new(to: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            title: title.into(),
            body: body.into(),
            data: serde_json::Value::Object(Default::default()),
            priority: "high",
            sound: "default",
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

#[derive(Clone)]
pub struct PushRelay {
    http: Arc<dyn HttpClient>,
    url: String,
    timeout: Duration,
}

impl PushRelay {
    pub fn new(http: Arc<dyn HttpClient>, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POSTs the message once. `true` when the relay accepted it.
    #[instrument(skip_all, fields(title = %message.title))]
    pub async fn send(&self, message: &PushMessage) -> bool {
        let request = match HttpRequest::new(HttpMethod::Post, self.url.as_str())
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .json(message)
        {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Failed to encode push message");
                return false;
            }
        };

        match self.http.execute(request).await {
            Ok(response) if response.is_success() => {
                debug!(status = response.status, "Push message accepted");
                true
            }
            Ok(response) => {
                warn!(
                    status = response.status,
                    body = %response.text().unwrap_or_default(),
                    "Push relay rejected message"
                );
                false
            }
            Err(e) => {
                warn!(error = %e, "Push relay unreachable");
                false
            }
        }
    }
}
