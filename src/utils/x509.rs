//! PEM certificate parsing

use sha2::{Digest, Sha256};
use x509_parser::pem::parse_x509_pem;

use super::error::{ProviderError, ProviderResult};

/// The parts of a certificate the provider compares and looks up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCertificate {
    /// Lowercase hex of the serial integer, no leading zeros
    pub serial: String,
    /// DER encoding of the first certificate in the PEM input
    pub der: Vec<u8>,
}

impl ParsedCertificate {
    /// Lowercase hex SHA-256 of the DER encoding
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.der))
    }
}

/// Decode the first PEM block and parse it as an X.509 certificate
pub fn parse_certificate(pem_data: &[u8]) -> ProviderResult<ParsedCertificate> {
    let (_, pem) = parse_x509_pem(pem_data)
        .map_err(|e| ProviderError::Decode(format!("failed to decode certificate PEM: {}", e)))?;

    let serial = {
        let cert = pem
            .parse_x509()
            .map_err(|e| ProviderError::Decode(format!("invalid certificate: {}", e)))?;
        cert.tbs_certificate.serial.to_str_radix(16)
    };

    Ok(ParsedCertificate {
        serial,
        der: pem.contents,
    })
}
