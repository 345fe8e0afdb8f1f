//! FILENAME: client/src/api.rs
//! PURPOSE: Transport seam between the controller and the remote collection.
//! CONTEXT: `CollectionApi` is the trait the controller drives; `HttpApi`
//! is the production implementation over a JSON REST surface. Tests supply
//! an in-memory implementation instead, so nothing above this module ever
//! touches the network directly.

use crate::error::ApiError;
use engine::Record;
use serde_json::Value;

/// The four operations the engine lifecycle needs from a remote collection.
pub trait CollectionApi {
    /// Fetches up to `limit` records from the collection.
    fn list(
        &self,
        endpoint: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Record>, ApiError>> + Send;

    /// Creates a record; returns the created record when the server sends
    /// one back (a 204 yields None).
    fn create(
        &self,
        endpoint: &str,
        payload: &Record,
    ) -> impl std::future::Future<Output = Result<Option<Record>, ApiError>> + Send;

    /// Replaces record `id`; same response convention as `create`.
    fn update(
        &self,
        endpoint: &str,
        id: i64,
        payload: &Record,
    ) -> impl std::future::Future<Output = Result<Option<Record>, ApiError>> + Send;

    fn delete(
        &self,
        endpoint: &str,
        id: i64,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;
}

// ============================================================================
// HTTP IMPLEMENTATION
// ============================================================================

/// JSON REST client carrying a bearer token on every request.
///
/// URL shape: `{base_url}/{endpoint}` for the collection and
/// `{base_url}/{endpoint}/{id}` for one record.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        HttpApi {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn collection_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    fn record_url(&self, endpoint: &str, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, endpoint, id)
    }

    /// Maps a non-success response to an error. A 401 marks the session as
    /// dead; everything else surfaces the server's `message` field when the
    /// body carries one, or the status otherwise.
    async fn reject(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").map(|m| match m {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                }))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                }),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return ApiError::Auth(message);
        }
        ApiError::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// Shared tail for create/update: 204 means no body, anything else
    /// must be a JSON object.
    async fn read_record(response: reqwest::Response) -> Result<Option<Record>, ApiError> {
        if response.status() == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let value: Value = response.json().await?;
        match value {
            Value::Object(map) => Ok(Some(map)),
            Value::Null => Ok(None),
            other => Err(ApiError::InvalidBody(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }
}

impl CollectionApi for HttpApi {
    async fn list(&self, endpoint: &str, limit: usize) -> Result<Vec<Record>, ApiError> {
        let url = format!("{}?limit={}", self.collection_url(endpoint), limit);
        log::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        let value: Value = response.json().await?;
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(map),
                    other => Err(ApiError::InvalidBody(format!(
                        "expected an object, got {}",
                        other
                    ))),
                })
                .collect(),
            other => Err(ApiError::InvalidBody(format!(
                "expected an array, got {}",
                other
            ))),
        }
    }

    async fn create(&self, endpoint: &str, payload: &Record) -> Result<Option<Record>, ApiError> {
        let url = self.collection_url(endpoint);
        log::debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Self::read_record(response).await
    }

    async fn update(
        &self,
        endpoint: &str,
        id: i64,
        payload: &Record,
    ) -> Result<Option<Record>, ApiError> {
        let url = self.record_url(endpoint, id);
        log::debug!("PUT {}", url);
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Self::read_record(response).await
    }

    async fn delete(&self, endpoint: &str, id: i64) -> Result<(), ApiError> {
        let url = self.record_url(endpoint, id);
        log::debug!("DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }
}
