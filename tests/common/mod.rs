//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ethscription_scout::api::EthscriptionsClient;
use ethscription_scout::config::ApiConfig;
use ethscription_scout::models::ScriptionTemplate;
use ethscription_scout::sync::HttpClient;

/// Template used by the scan tests
pub const TEMPLATE: &str = r#"data:,{"p":"erc-20","op":"mint","tick":"test","id":"${id}","amt":"1"}"#;

/// Client pointed at a mock server's `/api` prefix
pub fn create_test_client(server: &MockServer) -> EthscriptionsClient {
    let http = HttpClient::new(&ApiConfig::default()).expect("Failed to build HTTP client");
    EthscriptionsClient::new(http, format!("{}/api", server.uri()))
}

pub fn test_template() -> ScriptionTemplate {
    ScriptionTemplate::new(TEMPLATE).expect("Test template must carry the id marker")
}

fn exists_path(fingerprint: &str) -> String {
    format!("/api/ethscriptions/exists/{}", fingerprint)
}

/// Answer the existence lookup for `id` as not inscribed
pub async fn mount_available(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path(exists_path(&test_template().fingerprint(id))))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "result": false, "ethscription": null })),
        )
        .mount(server)
        .await;
}

/// Answer the existence lookup for `id` as already inscribed
pub async fn mount_claimed(server: &MockServer, id: u64) {
    Mock::given(method("GET"))
        .and(path(exists_path(&test_template().fingerprint(id))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": true,
            "ethscription": { "creator": "0xcreator", "current_owner": "0xholder" }
        })))
        .mount(server)
        .await;
}

/// Fail the first `times` lookups for `id` with the given status
///
/// Mount this before the regular answer; wiremock falls through once the
/// limited mock is used up.
pub async fn mount_failing(server: &MockServer, id: u64, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(exists_path(&test_template().fingerprint(id))))
        .respond_with(ResponseTemplate::new(status))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// JSON for one mint record
pub fn mint_record(protocol: &str, tick: &str, id: u64, hash: &str) -> Value {
    json!({
        "transaction_hash": hash,
        "content_uri": format!(
            r#"data:,{{"p":"{}","op":"mint","tick":"{}","id":"{}","amt":"1000"}}"#,
            protocol, tick, id
        ),
        "current_owner": "0xowner"
    })
}

/// Serve `page` (1-based) of the owner listing
pub async fn mount_owned_page(server: &MockServer, owner: &str, page: u32, records: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/api/ethscriptions/owned_by/{}", owner)))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(records)))
        .mount(server)
        .await;
}
