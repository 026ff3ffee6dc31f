//! Shared HTTP client used by every resource wrapper.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::Config;
use crate::errors::{ClientError, ClientResult};

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Backend error envelopes: `{ "error": { "message" } }` or `{ "message" }`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { message: String },
    Plain(String),
}

/// JSON client bound to one backend base URL.
///
/// Cloning is cheap and clones share the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn from_config(config: &Config) -> ClientResult<Self> {
        Self::new(&config.api_base_url, config.api_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install or drop the bearer token sent with every request.
    pub async fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.write().await = token;
    }

    pub async fn auth_token(&self) -> Option<String> {
        self.auth_token.read().await.clone()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(body)).await
    }

    /// POST without a request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::POST, path, None).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::DELETE, path, None).await
    }

    /// Send one request and decode the JSON body.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<T>` work for
    /// endpoints that answer 204.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(%method, path, request_id = %request_id, "API request");

        let mut builder = self
            .http
            .request(method.clone(), self.url(path))
            .header(header::ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = self.auth_token.read().await.as_deref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(status, &bytes);
            tracing::debug!(%method, path, request_id = %request_id, %status, "API error: {}", message);
            return Err(ClientError::Api { status, message });
        }

        let slice = if bytes.is_empty() {
            b"null".as_slice()
        } else {
            bytes.as_ref()
        };
        Ok(serde_json::from_slice(slice)?)
    }
}

/// Pull a human-readable message out of an error response.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let from_envelope = serde_json::from_slice::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| match envelope.error {
            Some(ErrorBody::Detailed { message }) | Some(ErrorBody::Plain(message)) => {
                Some(message)
            }
            None => envelope.message,
        });

    from_envelope.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_envelopes() {
        let detailed = br#"{"success":false,"error":{"code":"NOT_FOUND","message":"Tag not found"}}"#;
        assert_eq!(error_message(StatusCode::NOT_FOUND, detailed), "Tag not found");

        let flat = br#"{"message":"Invalid credentials"}"#;
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, flat),
            "Invalid credentials"
        );

        let plain = br#"{"error":"Too many requests"}"#;
        assert_eq!(
            error_message(StatusCode::TOO_MANY_REQUESTS, plain),
            "Too many requests"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_reason() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"<html>oops</html>"),
            "Bad Gateway"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b""), "Bad Gateway");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:9000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/activities"), "http://localhost:9000/api/activities");
    }

    #[tokio::test]
    async fn test_auth_token_shared_between_clones() {
        let client = ApiClient::new("http://localhost", Duration::from_secs(5)).unwrap();
        let clone = client.clone();
        client.set_auth_token(Some("abc".to_string())).await;
        assert_eq!(clone.auth_token().await.as_deref(), Some("abc"));
    }
}
