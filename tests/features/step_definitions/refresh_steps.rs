//! Certificate refresh steps

use cucumber::{given, then, when};

use stepca_provider::models::Severity;
use stepca_provider::resources::{CertificateModel, CertificateStatus};

use crate::features::support::{issue_certificate, TestWorld};

#[given(expr = "a stored certificate with serial {int}")]
async fn stored_certificate(world: &mut TestWorld, serial: u8) {
    world.serial = format!("{:x}", serial);
    world.stored = CertificateModel {
        csr: "REQUEST-A".to_string(),
        certificate: Some(issue_certificate(serial, "leaf.example.com")),
        force_rotate: None,
    };
}

#[given(expr = "a stored certificate value {string}")]
async fn stored_certificate_value(world: &mut TestWorld, value: String) {
    world.stored = CertificateModel {
        csr: "REQUEST-A".to_string(),
        certificate: Some(value),
        force_rotate: None,
    };
}

#[given("no stored certificate")]
async fn no_stored_certificate(world: &mut TestWorld) {
    world.stored = CertificateModel {
        csr: "REQUEST-A".to_string(),
        ..Default::default()
    };
}

#[given("the CA holds the same certificate")]
async fn ca_holds_same(world: &mut TestWorld) {
    let pem = world.stored.certificate.clone().unwrap_or_default();
    world.ca.hold(&world.serial, &pem);
}

#[given("the CA holds a different certificate under that serial")]
async fn ca_holds_different(world: &mut TestWorld) {
    let serial = u8::from_str_radix(&world.serial, 16).unwrap();
    world
        .ca
        .hold(&world.serial, &issue_certificate(serial, "impostor.example.com"));
}

#[given("the CA has no certificate under that serial")]
async fn ca_has_nothing(_world: &mut TestWorld) {}

#[given("the CA cannot be reached")]
async fn ca_unreachable(world: &mut TestWorld) {
    world.ca.go_offline();
}

#[given("no client is configured")]
async fn no_client(world: &mut TestWorld) {
    world.unconfigured = true;
}

#[when("the certificate is refreshed")]
async fn refresh(world: &mut TestWorld) {
    let resource = world.resource();
    let decision = resource.should_keep_certificate(&world.stored).await;
    world.decision = Some(decision);
}

#[then("the certificate is kept")]
async fn kept(world: &mut TestWorld) {
    assert!(world.decision.as_ref().unwrap().keep());
}

#[then("the certificate is removed")]
async fn removed(world: &mut TestWorld) {
    assert!(!world.decision.as_ref().unwrap().keep());
}

#[then(expr = "the status is {string}")]
async fn status_is(world: &mut TestWorld, status: String) {
    let expected = match status.as_str() {
        "verified" => CertificateStatus::Verified,
        "unverified" => CertificateStatus::Unverified,
        "lookup failed" => CertificateStatus::LookupFailed,
        "missing" => CertificateStatus::Missing,
        "unparsable" => CertificateStatus::Unparsable,
        "revoked" => CertificateStatus::Revoked,
        "drifted" => CertificateStatus::Drifted,
        other => panic!("unknown status {other}"),
    };
    assert_eq!(world.decision.as_ref().unwrap().status, expected);
}

#[then("no diagnostics are reported")]
async fn no_diagnostics(world: &mut TestWorld) {
    assert!(world.decision.as_ref().unwrap().diagnostics.is_empty());
}

#[then(expr = "a warning {string} is reported")]
async fn warning_reported(world: &mut TestWorld, summary: String) {
    let diags = &world.decision.as_ref().unwrap().diagnostics;
    assert!(diags
        .iter()
        .any(|d| d.severity == Severity::Warning && d.summary == summary));
    assert!(!diags.has_error());
}

#[then(expr = "an error {string} is reported")]
async fn error_reported(world: &mut TestWorld, summary: String) {
    let diags = &world.decision.as_ref().unwrap().diagnostics;
    assert!(diags
        .iter()
        .any(|d| d.severity == Severity::Error && d.summary == summary));
}
