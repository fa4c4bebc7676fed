//! HTTP client for the upstream catalog API
//!
//! Every request is bounded by the configured timeout. Network failures and
//! non-success statuses are retried with a linear backoff; timeouts are not.
//! Successful bodies are unwrapped from the upstream `{ data, success, message }`
//! envelope when present.

use crate::config::{ApiConfig, Endpoint};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors produced while talking to the upstream API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, DNS or transport failure
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The attempt did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The upstream answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The upstream payload declared a failure (`success: false` or `error`)
    #[error("Upstream error: {message}")]
    Upstream { message: String, status: u16 },

    /// The body was not JSON or did not have the expected shape
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status attached to the error, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::Upstream { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Timeout(_) | ApiError::Parse(_) => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Status { .. })
    }
}

/// Ordered query parameters; absent optional values are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn with_opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

/// Client for the upstream API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Creates a client for the given configuration.
    ///
    /// Every request carries a JSON content type.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Issues a `GET` request and returns the unwrapped payload.
    pub async fn get<T>(&self, endpoint: Endpoint, params: &QueryParams) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.config.url_for(endpoint.path());
        let (status, body) = self
            .send_with_retry(|| {
                let request = self.client.get(&url);
                if params.is_empty() {
                    request
                } else {
                    request.query(params.as_slice())
                }
            })
            .await?;

        unwrap_payload(status, &body)
    }

    /// Issues a `POST` request with an optional JSON body and returns the
    /// unwrapped payload.
    pub async fn post<T, B>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.config.url_for(endpoint.path());
        let (status, text) = self
            .send_with_retry(|| {
                let request = self.client.post(&url);
                match body {
                    Some(body) => request.json(body),
                    None => request,
                }
            })
            .await?;

        unwrap_payload(status, &text)
    }

    async fn send_with_retry<F>(&self, build: F) -> Result<(u16, String), ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        with_retry(&self.config, || self.send_once(build())).await
    }

    async fn send_once(&self, request: RequestBuilder) -> Result<(u16, String), ApiError> {
        let timeout = self.config.timeout;

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            debug!(url = %response.url(), status = status.as_u16(), "upstream responded");
            let body = response.text().await?;

            if !status.is_success() {
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok((status.as_u16(), body))
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout(timeout)),
        }
    }
}

/// Parses a successful body and strips the upstream response envelope.
/// Runs `attempt` until it succeeds, fails with a non-retryable error, or
/// the retry budget of `config` is spent. Sleeps `backoff_step * n` before
/// retry `n`.
pub(crate) async fn with_retry<T, F, Fut>(config: &ApiConfig, mut attempt: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retries = 0;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && retries < config.retries => {
                retries += 1;
                let delay = config.backoff_delay(retries);
                warn!(
                    error = %e,
                    attempt = retries,
                    delay_ms = delay.as_millis() as u64,
                    "upstream request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

pub(crate) fn unwrap_payload<T>(status: u16, body: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let mut payload: Value = serde_json::from_str(body)?;

    if let Some(object) = payload.as_object_mut() {
        let declared_failure = object.get("success") == Some(&Value::Bool(false));
        let error_field = object.get("error").filter(|v| is_truthy(v));

        if declared_failure || error_field.is_some() {
            let message = object
                .get("message")
                .filter(|v| is_truthy(v))
                .or(error_field)
                .map(value_to_message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(ApiError::Upstream { message, status });
        }

        if let Some(data) = object.remove("data").filter(|v| !v.is_null()) {
            return Ok(serde_json::from_value(data)?);
        }
    }

    Ok(serde_json::from_value(payload)?)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
