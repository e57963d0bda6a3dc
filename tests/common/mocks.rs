//! Mock step-ca for integration tests
//!
//! A wiremock server plus a provider configured against it. Expectations set
//! with `.expect(n)` are verified when the server is dropped.

use std::sync::Arc;

use wiremock::MockServer;

use stepca_provider::{ProviderConfig, StepCaClient, StepCaProvider};

pub const SIGN_TOKEN: &str = "ott-secret";
pub const ADMIN_TOKEN: &str = "admin-bearer";

pub struct MockCa {
    pub server: MockServer,
    pub provider: StepCaProvider,
}

impl MockCa {
    /// Start a mock CA with an admin token configured
    pub async fn start() -> Self {
        Self::start_with(Some(ADMIN_TOKEN)).await
    }

    pub async fn start_with(admin_token: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let provider = StepCaProvider::configure(&provider_config(&server.uri(), admin_token))
            .expect("mock provider configuration is valid");
        Self { server, provider }
    }

    pub fn client(&self) -> Arc<StepCaClient> {
        self.provider.client().cloned().unwrap()
    }
}

pub fn provider_config(ca_url: &str, admin_token: Option<&str>) -> ProviderConfig {
    ProviderConfig {
        ca_url: ca_url.to_string(),
        token: SIGN_TOKEN.to_string(),
        admin_name: "step".to_string(),
        admin_key: "/home/step/secrets/admin.key".to_string(),
        admin_provisioner: Some("admin-jwk".to_string()),
        admin_token: admin_token.map(str::to_string),
        timeout_secs: 5,
        ..Default::default()
    }
}
