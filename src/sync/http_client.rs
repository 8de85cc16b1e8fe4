//! HTTP client for the ethscriptions API
//!
//! Thin wrapper over reqwest that applies a request timeout and maps transport
//! failures and HTTP statuses onto [`ApiError`].

use crate::config::ApiConfig;
use crate::error::ApiError;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Wait assumed when a 429 carries no usable Retry-After header
const DEFAULT_RATE_LIMIT_WAIT_SECS: u64 = 60;

/// HTTP client used by the API adapters
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with the configured timeout
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ethscription-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Create a client around an existing reqwest Client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Perform a GET request and return the raw body
    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Bytes, ApiError> {
        debug!(url = url, "Sending HTTP GET request");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            status if status.is_success() => {
                let body = response.bytes().await.map_err(map_transport_error)?;
                debug!(url = url, body_size = body.len(), "Received response");
                Ok(body)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let wait = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RATE_LIMIT_WAIT_SECS);

                warn!(url = url, retry_after = wait, "Rate limited by upstream");
                Err(ApiError::RateLimited(wait))
            }
            StatusCode::NOT_FOUND => {
                debug!(url = url, "Resource not found (404)");
                Err(ApiError::NotFound)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(url = url, status = ?response.status(), "Unauthorized");
                Err(ApiError::Unauthorized)
            }
            status => {
                warn!(url = url, status = status.as_u16(), "Unexpected status");
                Err(ApiError::ServerError(status.as_u16()))
            }
        }
    }

    /// Perform a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let body = self.get(url, query).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidData(e.to_string()))
    }
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::NetworkTimeout
    } else if err.is_connect() {
        ApiError::ConnectionRefused
    } else {
        ApiError::Network(err.to_string())
    }
}
