//! Blocking HTTP client the dashboard uses to reach the recommendation service.
//!
//! Calls run on the dashboard's worker thread, so the blocking reqwest API is
//! used instead of async.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::api::types::{HealthResponse, RecommendRequest, RootResponse};
use crate::config::ClientConfig;
use crate::domain::ScoredDoctor;

/// Shown when an error body carries no `detail`.
pub const GENERIC_API_ERROR: &str = "Error in API response";

/// Failures surfaced to the dashboard as display text.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, timeout or non-JSON body
    #[error("API call failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// `top_doctors` present but not in the expected shape
    #[error("API call failed: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service answered with an error body
    #[error("{0}")]
    Api(String),
}

/// Calls the dashboard makes against the service.
pub trait RecommendationApi: Send + Sync {
    /// `GET /` liveness message.
    fn root(&self) -> Result<RootResponse, ClientError>;

    /// `GET /health` load status.
    fn health(&self) -> Result<HealthResponse, ClientError>;

    /// `POST /recommend_top_n`.
    fn recommend(&self, request: &RecommendRequest) -> Result<Vec<ScoredDoctor>, ClientError>;
}

/// HTTP client for the recommendation API
pub struct RecommendationClient {
    client: Client,
    base_url: String,
}

impl RecommendationClient {
    /// Create a client for `config.api_url`.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RecommendationApi for RecommendationClient {
    /// `GET /` liveness message.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` on connection or decode failure.
    fn root(&self) -> Result<RootResponse, ClientError> {
        let url = format!("{}/", self.base_url);
        Ok(self.client.get(&url).send()?.error_for_status()?.json()?)
    }

    /// `GET /health` load status.
    ///
    /// # Errors
    /// Returns `ClientError::Transport` on connection or decode failure.
    fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = format!("{}/health", self.base_url);
        Ok(self.client.get(&url).send()?.error_for_status()?.json()?)
    }

    /// `POST /recommend_top_n`.
    ///
    /// The body is inspected regardless of status code: `top_doctors` means
    /// success, anything else is reported through its `detail`.
    ///
    /// # Errors
    /// Returns `ClientError` with the text the dashboard should display.
    fn recommend(&self, request: &RecommendRequest) -> Result<Vec<ScoredDoctor>, ClientError> {
        let url = format!("{}/recommend_top_n", self.base_url);

        let response = self.client.post(&url).json(request).send()?;
        let status = response.status();
        let body: Value = response.json()?;

        tracing::debug!(%status, "Recommendation response received");

        parse_recommend_body(body)
    }
}

/// Interpret a `POST /recommend_top_n` response body.
///
/// # Errors
/// Returns `ClientError::Api` with the `detail` text (or a generic message)
/// when `top_doctors` is absent.
pub fn parse_recommend_body(mut body: Value) -> Result<Vec<ScoredDoctor>, ClientError> {
    if let Some(top) = body.get_mut("top_doctors").map(Value::take) {
        return Ok(serde_json::from_value(top)?);
    }

    let detail = match body.get("detail") {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => GENERIC_API_ERROR.to_string(),
    };
    Err(ClientError::Api(detail))
}
