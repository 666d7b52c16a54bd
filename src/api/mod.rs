//! HTTP service layer for the Momentum backend.
//!
//! One method per endpoint, one request per call, no retries and no error
//! translation: failures come back as [`ApiError`] for the caller to
//! classify. Every request goes through [`ApiClient::request`], which
//! attaches the stored bearer token.

mod error;
mod goals;
mod routines;
mod tasks;

use std::sync::Arc;

use momentum_core::Database;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;

pub use error::{ApiError, ApiResult, ErrorKind};

/// Where the bearer token comes from.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> anyhow::Result<Option<String>>;
}

impl TokenSource for Database {
    fn token(&self) -> anyhow::Result<Option<String>> {
        Database::token(self)
    }
}

/// A fixed token, or none.
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn token(&self) -> anyhow::Result<Option<String>> {
        Ok(self.0.clone())
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    root: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    pub fn new(config: &Config, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            root: config.api_root(),
            tokens,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Shared request builder: resolves the path against the API root and
    /// attaches the bearer token when one is stored.
    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = format!("{}{}", self.root, path);
        tracing::debug!(%method, %url, "api request");

        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = self.tokens.token().map_err(ApiError::Store)? {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let body = self.execute(builder).await?;
        Ok(serde_json::from_value(unwrap_data(serde_json::from_str(&body)?))?)
    }

    /// For calls whose response body is not needed.
    async fn send_empty(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.execute(builder).await.map(|_| ())
    }

    async fn execute(&self, builder: RequestBuilder) -> ApiResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "api request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// Responses arrive either bare or wrapped in `{"data": ...}`.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unwraps_data_envelope_only_when_present() {
        assert_eq!(unwrap_data(json!({ "data": [1, 2] })), json!([1, 2]));
        assert_eq!(unwrap_data(json!({ "id": 1 })), json!({ "id": 1 }));
        assert_eq!(unwrap_data(json!([])), json!([]));
    }
}
