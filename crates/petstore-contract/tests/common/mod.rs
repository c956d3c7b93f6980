//! Common test utilities and helpers

use std::path::Path;
use std::time::Duration;

use petstore_contract::ApiClient;
use rstest::fixture;
use wiremock::MockServer;

/// Path prefix every mocked endpoint lives under
#[allow(dead_code)]
pub const API_PREFIX: &str = "/api/v3";

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Load a response fixture as JSON
#[allow(dead_code)]
pub fn load_json_fixture(name: &str) -> serde_json::Value {
    serde_json::from_str(&load_response_fixture(name))
        .unwrap_or_else(|e| panic!("Response fixture '{}' is not JSON: {}", name, e))
}

/// Full mocked path for an endpoint
#[allow(dead_code)]
pub fn api_path(endpoint: &str) -> String {
    format!("{API_PREFIX}{endpoint}")
}

/// A fresh mock server per test
#[allow(dead_code)]
#[fixture]
pub async fn mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server's `/api/v3`
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::builder()
        .base_url(format!("{}{API_PREFIX}", server.uri()))
        .timeout(Duration::from_secs(5))
        .build()
        .expect("Failed to build client")
}
