//! Shared request pipeline for the fleet REST API

use crate::error::{ApiError, Result};
use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_runtime::config::ApiConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Header carrying the static API key
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP pipeline shared by every resource client.
///
/// Each call is a single attempt with the configured timeout. There is no
/// per-session token, retry or backoff.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    base_url: Url,
    timeout: Duration,
    api_key: String,
}

impl ApiClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        Ok(Self {
            http,
            base_url,
            timeout,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(http: Arc<dyn HttpClient>, config: &ApiConfig) -> Result<Self> {
        Self::new(
            http,
            &config.base_url(),
            config.api_key.clone(),
            config.timeout,
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Base URL extended with percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: HttpMethod, url: &Url) -> HttpRequest {
        HttpRequest::new(method, url.as_str())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header(API_KEY_HEADER, self.api_key.as_str())
            .timeout(self.timeout)
    }

    /// Sends one request and turns non-2xx answers into [`ApiError::Status`].
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "API request");

        let started = Instant::now();
        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    %method,
                    %url,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "API request failed"
                );
                return Err(ApiError::Network(e));
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if !response.is_success() {
            let body = response.text().unwrap_or_default();
            warn!(%method, %url, status = response.status, elapsed_ms, body = %body, "API error response");
            return Err(ApiError::Status {
                status: response.status,
                body,
            });
        }

        info!(%method, %url, status = response.status, elapsed_ms, "API response");
        Ok(response)
    }

    async fn send_for<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<Option<T>> {
        let response = self.send(request).await?;
        if response.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&response.body)?))
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        self.send_for(self.request(HttpMethod::Get, url))
            .await?
            .ok_or_else(|| ApiError::Decode(format!("empty body from GET {}", url)))
    }

    /// POST with a JSON body; `None` when the server answers without content
    pub async fn post<B, T>(&self, url: &Url, body: &B) -> Result<Option<T>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(HttpMethod::Post, url)
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send_for(request).await
    }

    pub async fn put<B, T>(&self, url: &Url, body: &B) -> Result<Option<T>>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(HttpMethod::Put, url)
            .json(body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send_for(request).await
    }

    /// PATCH without a body
    pub async fn patch<T: DeserializeOwned>(&self, url: &Url) -> Result<Option<T>> {
        self.send_for(self.request(HttpMethod::Patch, url)).await
    }

    pub async fn delete(&self, url: &Url) -> Result<()> {
        self.send(self.request(HttpMethod::Delete, url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{response, MockHttpClient, BASE_URL};
    use bridge_traits::error::BridgeError;
    use core_runtime::config::ApiEnvironment;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        ok: bool,
    }

    fn client(mock: MockHttpClient) -> ApiClient {
        ApiClient::new(Arc::new(mock), BASE_URL, "test-key", Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_and_encodes_segments() {
        let client = client(MockHttpClient::new());

        assert_eq!(
            client.endpoint(&["Moto"]).as_str(),
            "http://localhost:5000/api/Moto"
        );
        assert_eq!(
            client.endpoint(&["v1", "filial", "a b", "toggle-status"]).as_str(),
            "http://localhost:5000/api/v1/filial/a%20b/toggle-status"
        );
    }

    #[test]
    fn test_from_config_uses_environment_base() {
        let config = ApiConfig {
            environment: ApiEnvironment::Lan {
                host: "192.168.0.12".to_string(),
            },
            ..ApiConfig::default()
        };
        let client = ApiClient::from_config(Arc::new(MockHttpClient::new()), &config).unwrap();

        assert_eq!(client.base_url().as_str(), "http://192.168.0.12:5000/api");
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let http: Arc<dyn HttpClient> = Arc::new(MockHttpClient::new());
        assert!(ApiClient::new(http.clone(), "not a url", "k", Duration::from_secs(1)).is_err());
        assert!(ApiClient::new(http, "mailto:ops@fleet", "k", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn test_static_headers_and_timeout_on_every_request() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Get
                    && req.headers.get("X-Api-Key").map(String::as_str) == Some("test-key")
                    && req.headers.get("Accept").map(String::as_str) == Some("application/json")
                    && req.headers.get("Content-Type").map(String::as_str)
                        == Some("application/json")
                    && req.timeout == Some(Duration::from_secs(10))
            })
            .times(1)
            .returning(|_| Ok(response(200, r#"{"ok":true}"#)));

        let client = client(mock);
        let ping: Ping = client.get(&client.endpoint(&["ping"])).await.unwrap();
        assert_eq!(ping, Ping { ok: true });
    }

    #[tokio::test]
    async fn test_non_success_becomes_status_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(response(503, "maintenance")));

        let client = client(mock);
        let err = client
            .get::<Ping>(&client.endpoint(&["ping"]))
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::ConnectionFailed("refused".to_string())));

        let client = client(mock);
        let err = client.delete(&client.endpoint(&["Moto", "1"])).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_empty_body_is_none() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(response(204, "")));

        let client = client(mock);
        let result: Option<Ping> = client
            .put(&client.endpoint(&["Moto", "1"]), &serde_json::json!({}))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_empty_get_body_is_decode_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, "")));

        let client = client(mock);
        let err = client
            .get::<Ping>(&client.endpoint(&["ping"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
