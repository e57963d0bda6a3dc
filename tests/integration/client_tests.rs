//! Client integration tests
//!
//! Request shapes and status handling of `StepCaClient`.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{admin, jwk_provisioner, MockCa, ADMIN_TOKEN, SIGN_TOKEN};
use stepca_provider::models::Template;
use stepca_provider::ProviderError;

#[tokio::test]
async fn test_sign_posts_csr_and_token() {
    let ca = MockCa::start().await;
    Mock::given(method("POST"))
        .and(path("/sign"))
        .and(body_json(json!({"csr": "REQUEST-A", "ott": SIGN_TOKEN})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"crt": "CERT-A"})))
        .expect(1)
        .mount(&ca.server)
        .await;

    let crt = ca.client().sign("REQUEST-A").await.unwrap();
    assert_eq!(crt, "CERT-A");
}

#[tokio::test]
async fn test_sign_error_carries_status_and_body() {
    let ca = MockCa::start().await;
    Mock::given(method("POST"))
        .and(path("/sign"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&ca.server)
        .await;

    let err = ca.client().sign("REQUEST-A").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "unexpected status: 401 (invalid token)");
}

#[tokio::test]
async fn test_sign_with_malformed_body_is_decode_error() {
    let ca = MockCa::start().await;
    Mock::given(method("POST"))
        .and(path("/sign"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"crt\":"))
        .mount(&ca.server)
        .await;

    let err = ca.client().sign("REQUEST-A").await.unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
}

#[tokio::test]
async fn test_certificate_lookup() {
    let ca = MockCa::start().await;
    Mock::given(method("GET"))
        .and(path("/certificates/1f"))
        .respond_with(ResponseTemplate::new(200).set_body_string("PEM"))
        .mount(&ca.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/certificates/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ca.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/certificates/3"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ca.server)
        .await;

    let client = ca.client();
    assert_eq!(client.certificate("1f").await.unwrap(), Some(b"PEM".to_vec()));
    assert_eq!(client.certificate("2").await.unwrap(), None);
    assert_eq!(client.certificate("3").await.unwrap_err().status(), Some(503));
}

#[tokio::test]
async fn test_version_is_trimmed() {
    let ca = MockCa::start().await;
    Mock::given(method("GET"))
        .and(path("/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0.27.4\n"))
        .mount(&ca.server)
        .await;

    assert_eq!(ca.client().version().await.unwrap(), "0.27.4");
}

#[tokio::test]
async fn test_admin_calls_carry_bearer_token() {
    let ca = MockCa::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/provisioners"))
        .and(header("authorization", format!("Bearer {}", ADMIN_TOKEN).as_str()))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "ops", "type": "JWK", "admin": true})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ca.server)
        .await;

    ca.client()
        .create_provisioner(&jwk_provisioner("ops", true))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_admin_token_sends_no_authorization() {
    let ca = MockCa::start_with(None).await;
    Mock::given(method("GET"))
        .and(path("/admin/provisioners/ops"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ca.server)
        .await;

    assert_eq!(ca.client().get_provisioner("ops").await.unwrap(), None);

    let requests = ca.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_provisioner_list_and_get() {
    let ca = MockCa::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/provisioners"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "admin-jwk", "type": "JWK", "admin": true},
            {"name": "acme", "type": "ACME"}
        ])))
        .mount(&ca.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/provisioners/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "acme", "type": "ACME", "x509_template": "leaf"
        })))
        .mount(&ca.server)
        .await;

    let client = ca.client();
    let all = client.list_provisioners().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all[0].admin);

    let acme = client.get_provisioner("acme").await.unwrap().unwrap();
    assert_eq!(acme.provisioner_type, "ACME");
    assert_eq!(acme.x509_template.as_deref(), Some("leaf"));
}

#[tokio::test]
async fn test_delete_tolerates_not_found() {
    let ca = MockCa::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/provisioners/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&ca.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/templates/locked"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&ca.server)
        .await;

    let client = ca.client();
    client.delete_provisioner("gone").await.unwrap();
    assert_eq!(
        client.delete_template("locked").await.unwrap_err().status(),
        Some(409)
    );
}

#[tokio::test]
async fn test_admin_key_in_path_and_query() {
    let ca = MockCa::start().await;
    Mock::given(method("PUT"))
        .and(path("/admin/admins/alice"))
        .and(query_param("provisioner", "jwk"))
        .and(body_json(json!({"name": "alice", "provisioner": "oidc"})))
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

    let client = ca.client();
    client
        .replace_admin("alice", "jwk", &admin("alice", "oidc"))
        .await
        .unwrap();
    assert_eq!(
        client.get_admin("alice", "oidc").await.unwrap(),
        Some(admin("alice", "oidc"))
    );
}

#[tokio::test]
async fn test_template_update_uses_name_in_path() {
    let ca = MockCa::start().await;
    Mock::given(method("PUT"))
        .and(path("/admin/templates/leaf"))
        .and(body_json(json!({"name": "leaf", "body": "{}"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ca.server)
        .await;

    ca.client()
        .update_template(&Template {
            name: "leaf".to_string(),
            body: "{}".to_string(),
            metadata: None,
        })
        .await
        .unwrap();
}
