//! Test fixtures for certificates and admin payloads

use rcgen::{CertificateParams, KeyPair, SerialNumber};

use stepca_provider::models::{Admin, Provisioner};

pub use stepca_provider::dummy_ca::DUMMY_CERTIFICATE_PEM;

/// Self-signed certificate with the given serial
pub fn issue_certificate(serial: &[u8], host: &str) -> String {
    let mut params = CertificateParams::new(vec![host.to_string()]).unwrap();
    params.serial_number = Some(SerialNumber::from_slice(serial));
    let key = KeyPair::generate().unwrap();
    params.self_signed(&key).unwrap().pem()
}

pub fn jwk_provisioner(name: &str, admin: bool) -> Provisioner {
    Provisioner {
        name: name.to_string(),
        provisioner_type: "JWK".to_string(),
        admin,
        ..Default::default()
    }
}

pub fn admin(name: &str, provisioner: &str) -> Admin {
    Admin {
        name: name.to_string(),
        provisioner: provisioner.to_string(),
    }
}
