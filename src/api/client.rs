//! HTTP implementation of the ethscriptions API collaborators
//!
//! Endpoints used:
//! - `GET {base}/ethscriptions/exists/{sha}`
//! - `GET {base}/ethscriptions/owned_by/{address}?per_page=N&page=P`

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{ExistenceCheck, ExistenceStatus, RecordSource};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::Record;
use crate::sync::HttpClient;

/// Wire shape of the `exists` endpoint
#[derive(Debug, Deserialize)]
struct ExistsResponse {
    result: bool,
    #[serde(default)]
    ethscription: Option<ExistingEthscription>,
}

#[derive(Debug, Deserialize)]
struct ExistingEthscription {
    #[serde(default)]
    creator: Option<String>,
    #[serde(default)]
    current_owner: Option<String>,
}

impl From<ExistsResponse> for ExistenceStatus {
    fn from(response: ExistsResponse) -> Self {
        let (creator, current_owner) = response
            .ethscription
            .map(|e| (e.creator, e.current_owner))
            .unwrap_or((None, None));
        Self {
            found: response.result,
            creator,
            current_owner,
        }
    }
}

/// Client for the ethscriptions REST API
#[derive(Debug, Clone)]
pub struct EthscriptionsClient {
    http: HttpClient,
    base_url: String,
}

impl EthscriptionsClient {
    /// Create a client against an explicit base URL
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client for the configured network
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let http = HttpClient::new(&config.api)?;
        Ok(Self::new(http, config.api_base_url()))
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ExistenceCheck for EthscriptionsClient {
    async fn check(&self, fingerprint: &str) -> Result<ExistenceStatus, ApiError> {
        let url = format!("{}/ethscriptions/exists/{}", self.base_url, fingerprint);
        let response: ExistsResponse = self.http.get_json(&url, &[]).await?;
        Ok(response.into())
    }
}

#[async_trait]
impl RecordSource for EthscriptionsClient {
    async fn owned_by(
        &self,
        owner: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Record>, ApiError> {
        let url = format!("{}/ethscriptions/owned_by/{}", self.base_url, owner);
        let records: Vec<Record> = self
            .http
            .get_json(
                &url,
                &[("per_page", per_page.to_string()), ("page", page.to_string())],
            )
            .await?;
        debug!(owner = owner, page = page, records = records.len(), "Fetched page");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> EthscriptionsClient {
        let http = HttpClient::new(&ApiConfig::default()).unwrap();
        EthscriptionsClient::new(http, format!("{}/api/", server.uri()))
    }

    #[tokio::test]
    async fn test_check_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ethscriptions/exists/abc123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "result": false, "ethscription": null })),
            )
            .mount(&mock_server)
            .await;

        let status = client_for(&mock_server).check("abc123").await.unwrap();

        assert_eq!(status, ExistenceStatus::not_found());
    }

    #[tokio::test]
    async fn test_check_claimed_reports_creator_and_owner() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ethscriptions/exists/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": true,
                "ethscription": {
                    "creator": "0xcreator",
                    "current_owner": "0xowner",
                    "transaction_hash": "0x01"
                }
            })))
            .mount(&mock_server)
            .await;

        let status = client_for(&mock_server).check("abc123").await.unwrap();

        assert_eq!(status, ExistenceStatus::claimed("0xcreator", "0xowner"));
    }

    #[tokio::test]
    async fn test_check_surfaces_server_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).check("abc123").await;

        assert_eq!(result.unwrap_err(), ApiError::ServerError(502));
    }

    #[tokio::test]
    async fn test_owned_by_sends_paging_parameters() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ethscriptions/owned_by/0xowner"))
            .and(query_param("page", "2"))
            .and(query_param("per_page", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "transaction_hash": "0x01", "content_uri": "data:,a" },
                { "transaction_hash": "0x02", "content_uri": "data:,b" }
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let records = client_for(&mock_server)
            .owned_by("0xowner", 2, 25)
            .await
            .unwrap();

        assert_eq!(
            records,
            vec![Record::new("data:,a", "0x01"), Record::new("data:,b", "0x02")]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let http = HttpClient::new(&ApiConfig::default()).unwrap();
        let client = EthscriptionsClient::new(http, "https://example.com/api/");

        assert_eq!(client.base_url(), "https://example.com/api");
    }

    #[test]
    fn test_from_config_uses_network_default() {
        let client = EthscriptionsClient::from_config(&Config::default()).unwrap();

        assert_eq!(
            client.base_url(),
            "https://goerli-api.ethscriptions.com/api"
        );
    }
}
