//! Decoding of certificates embedded in `extraCerts`

use der::Decode;
use x509_cert::Certificate;

/// Turns one encoded certificate into a usable value
pub trait CertificateDecoder {
    type Certificate;

    fn decode(&self, der: &[u8]) -> Result<Self::Certificate, der::Error>;
}

/// Decodes X.509 v3 certificates with `x509-cert`
#[derive(Clone, Copy, Debug, Default)]
pub struct X509CertificateDecoder;

impl CertificateDecoder for X509CertificateDecoder {
    type Certificate = Certificate;

    fn decode(&self, der: &[u8]) -> Result<Certificate, der::Error> {
        Certificate::from_der(der)
    }
}
