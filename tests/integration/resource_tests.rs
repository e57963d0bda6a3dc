//! Reconciler integration tests
//!
//! Resources wired through `StepCaProvider` against a mock CA.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{issue_certificate, MockCa, DUMMY_CERTIFICATE_PEM, SIGN_TOKEN};
use stepca_provider::resources::{
    AdminModel, CertificateModel, CertificateStatus, ProvisionerModel, Resource, TemplateModel,
};
use stepca_provider::StepCaProvider;

fn certificate(pem: Option<&str>) -> CertificateModel {
    CertificateModel {
        csr: "REQUEST-A".to_string(),
        certificate: pem.map(str::to_string),
        force_rotate: None,
    }
}

#[tokio::test]
async fn test_certificate_create_stores_signed_pem() {
    let ca = MockCa::start().await;
    Mock::given(method("POST"))
        .and(path("/sign"))
        .and(body_json(json!({"csr": "REQUEST-A", "ott": SIGN_TOKEN})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"crt": "CERT-A"})))
        .expect(1)
        .mount(&ca.server)
        .await;

    let resp = ca.provider.certificate_resource().create(certificate(None)).await;

    assert!(!resp.has_error());
    assert_eq!(resp.state.unwrap().certificate.as_deref(), Some("CERT-A"));
}

#[tokio::test]
async fn test_certificate_revoked_at_ca_is_dropped() {
    let ca = MockCa::start().await;
    Mock::given(method("GET"))
        .and(path("/certificates/1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&ca.server)
        .await;

    let decision = ca
        .provider
        .certificate_resource()
        .should_keep_certificate(&certificate(Some(DUMMY_CERTIFICATE_PEM)))
        .await;

    assert!(!decision.keep());
    assert_eq!(decision.status, CertificateStatus::Revoked);
    let summaries: Vec<_> = decision.diagnostics.warnings().map(|d| d.summary.as_str()).collect();
    assert_eq!(summaries, vec!["certificate revoked"]);
}

#[tokio::test]
async fn test_certificate_identical_at_ca_is_kept() {
    let ca = MockCa::start().await;
    Mock::given(method("GET"))
        .and(path("/certificates/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DUMMY_CERTIFICATE_PEM))
        .expect(1)
        .mount(&ca.server)
        .await;

    let decision = ca
        .provider
        .certificate_resource()
        .should_keep_certificate(&certificate(Some(DUMMY_CERTIFICATE_PEM)))
        .await;

    assert!(decision.keep());
    assert_eq!(decision.status, CertificateStatus::Verified);
    assert!(decision.diagnostics.is_empty());
}

#[tokio::test]
async fn test_certificate_drift_is_dropped() {
    let ca = MockCa::start().await;
    let other = issue_certificate(&[1], "other.example.com");
    Mock::given(method("GET"))
        .and(path("/certificates/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(other))
        .mount(&ca.server)
        .await;

    let resp = ca
        .provider
        .certificate_resource()
        .read(certificate(Some(DUMMY_CERTIFICATE_PEM)))
        .await;

    assert!(resp.state.is_none());
    assert_eq!(
        resp.diagnostics.iter().next().unwrap().summary,
        "certificate drift detected"
    );
}

#[tokio::test]
async fn test_certificate_lookup_error_keeps_state() {
    let ca = MockCa::start().await;
    Mock::given(method("GET"))
        .and(path("/certificates/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ca.server)
        .await;

    let resp = ca
        .provider
        .certificate_resource()
        .read(certificate(Some(DUMMY_CERTIFICATE_PEM)))
        .await;

    assert!(resp.state.is_some());
    assert!(resp.has_error());
}

#[tokio::test]
async fn test_certificate_unconfigured_provider_keeps_unverified() {
    let decision = StepCaProvider::unconfigured()
        .certificate_resource()
        .should_keep_certificate(&certificate(Some(DUMMY_CERTIFICATE_PEM)))
        .await;

    assert_eq!(decision.status, CertificateStatus::Unverified);
    assert!(decision.keep());
}

#[tokio::test]
async fn test_certificate_update_without_changes_makes_no_calls() {
    let ca = MockCa::start().await;

    let resp = ca
        .provider
        .certificate_resource()
        .update(certificate(None), certificate(Some("CERT-A")))
        .await;

    assert_eq!(resp.state.unwrap().certificate.as_deref(), Some("CERT-A"));
    assert!(ca.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_provisioner_admin_flag_update_puts_then_gets() {
    let ca = MockCa::start().await;
    Mock::given(method("PUT"))
        .and(path("/admin/provisioners/ops"))
        .and(body_json(json!({"name": "ops", "type": "JWK", "admin": false})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ca.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/provisioners/ops"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "ops", "type": "JWK", "admin": false})),
        )
        .expect(1)
        .mount(&ca.server)
        .await;

    let state = ProvisionerModel {
        name: "ops".to_string(),
        provisioner_type: "JWK".to_string(),
        admin: Some(true),
        ..Default::default()
    };
    let plan = ProvisionerModel {
        admin: Some(false),
        ..state.clone()
    };

    let resp = ca.provider.provisioner_resource().update(plan, state).await;

    assert!(!resp.has_error());
    assert_eq!(resp.state.unwrap().admin, Some(false));
    let methods: Vec<String> = ca
        .server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.method.to_string())
        .collect();
    assert_eq!(methods, vec!["PUT", "GET"]);
}

#[tokio::test]
async fn test_provisioner_type_change_issues_no_requests() {
    let ca = MockCa::start().await;
    let state = ProvisionerModel {
        name: "ops".to_string(),
        provisioner_type: "JWK".to_string(),
        ..Default::default()
    };
    let plan = ProvisionerModel {
        provisioner_type: "ACME".to_string(),
        ..state.clone()
    };

    let resp = ca.provider.provisioner_resource().update(plan, state).await;

    assert!(resp.has_error());
    assert_eq!(resp.diagnostics.iter().next().unwrap().summary, "type is immutable");
    assert!(ca.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_provisioner_delete_then_read_is_absent() {
    let ca = MockCa::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/provisioners"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ca.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/provisioners/ops"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ca.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/provisioners/ops"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&ca.server)
        .await;

    let resource = ca.provider.provisioner_resource();
    let model = ProvisionerModel {
        name: "ops".to_string(),
        provisioner_type: "JWK".to_string(),
        ..Default::default()
    };

    let created = resource.create(model.clone()).await;
    assert!(!created.has_error());
    assert!(!resource.delete(model.clone()).await.has_error());

    let read = resource.read(model).await;
    assert!(read.state.is_none());
    assert!(!read.has_error());
}

#[tokio::test]
async fn test_admin_provisioner_change_replaces_at_old_key() {
    let ca = MockCa::start().await;
    Mock::given(method("PUT"))
        .and(path("/admin/admins/alice"))
        .and(query_param("provisioner", "jwk"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ca.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/admins/alice"))
        .and(query_param("provisioner", "oidc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"name": "alice", "provisioner": "oidc"})),
        )
        .expect(1)
        .mount(&ca.server)
        .await;

    let state = AdminModel {
        name: "alice".to_string(),
        provisioner_name: "jwk".to_string(),
    };
    let plan = AdminModel {
        provisioner_name: "oidc".to_string(),
        ..state.clone()
    };

    let resp = ca.provider.admin_resource().update(plan.clone(), state).await;

    assert!(!resp.has_error());
    assert_eq!(resp.state, Some(plan));
}

#[tokio::test]
async fn test_template_read_normalizes_empty_metadata() {
    let ca = MockCa::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/templates/leaf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "leaf", "body": "{\"subject\": {}}", "metadata": {}
        })))
        .mount(&ca.server)
        .await;

    let resp = ca
        .provider
        .template_resource()
        .read(TemplateModel {
            name: "leaf".to_string(),
            ..Default::default()
        })
        .await;

    let state = resp.state.unwrap();
    assert_eq!(state.body, "{\"subject\": {}}");
    assert_eq!(state.metadata, None);
}
