//! Shared HTTP client
//!
//! One `reqwest::Client` behind a cheaply cloneable handle carrying the
//! backend base URL. The base URL is injectable so tests can point the
//! client at a mock server.

use crate::config::ApiConfig;
use crate::error::ClientError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend error envelope, e.g. `{"error": "Subject not found"}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: String,
}

/// Shared HTTP client for the course-assistant backend
///
/// Clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for an explicit base URL with default settings
    ///
    /// Used by tests to target a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON resource
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        tracing::debug!(path = %path, "GET");
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    /// GET a JSON resource with query parameters
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        tracing::debug!(path = %path, "GET");
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Self::decode(response).await
    }

    /// POST a JSON body and decode a JSON response
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        tracing::debug!(path = %path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    /// POST without a body and decode a JSON response
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        tracing::debug!(path = %path, "POST");
        let response = self.http.post(self.url(path)).send().await?;
        Self::decode(response).await
    }

    /// POST without a body, discarding any response payload
    pub async fn post_unit(&self, path: &str) -> Result<(), ClientError> {
        tracing::debug!(path = %path, "POST");
        let response = self.http.post(self.url(path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// POST a JSON body, discarding any response payload
    pub async fn post_json_unit<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        tracing::debug!(path = %path, "POST");
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// PUT a JSON body and decode a JSON response
    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        tracing::debug!(path = %path, "PUT");
        let response = self.http.put(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    /// DELETE a resource, discarding any response payload
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        tracing::debug!(path = %path, "DELETE");
        let response = self.http.delete(self.url(path)).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// POST a multipart form, discarding any response payload
    pub async fn post_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<(), ClientError> {
        tracing::debug!(path = %path, "POST multipart");
        let response = self
            .http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Map a non-2xx response into `ClientError::Api`
    ///
    /// The backend wraps failures as `{"error": message}`; fall back to the
    /// raw body when the envelope does not parse.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error)
            .unwrap_or(body);

        tracing::error!(
            status_code = status.as_u16(),
            message = %message,
            "Backend returned error status"
        );

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}
