//! Producing protected PKI messages
//!
//! The builder is the counterpart of [`ProtectedPkiMessage`]'s verification:
//! it names the protection algorithm in the header, then streams the same
//! canonical protected part through a MAC or signature calculator.

use crate::error::CmpError;
use crate::protected::{process, ProtectedPkiMessage};
use der::asn1::{Any, BitString};
use der::Decode;
use pkicmp_crypto::{ContentSigner, MacFactory};
use pkicmp_protocol::{PkiBody, PkiHeader, PkiMessage};
use tracing::debug;

/// Builder for protected PKI messages
///
/// # Example
///
/// ```
/// use pkicmp::prelude::*;
/// use pkicmp::der::asn1::Ia5String;
/// use pkicmp::x509_cert::ext::pkix::name::GeneralName;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dns = |name: &str| -> Result<GeneralName, pkicmp::der::Error> {
///     Ok(GeneralName::DnsName(Ia5String::new(name)?))
/// };
/// let header = PkiHeader::new(dns("client")?, dns("ca")?);
///
/// let factory = PkMacBuilder::new().build(b"shared secret")?;
/// let message = ProtectedPkiMessageBuilder::new(header, PkiBody::pki_confirm()?)
///     .build_with_mac(&factory)?;
///
/// assert!(message.verify_mac(&mut PkMacBuilder::new(), b"shared secret")?);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ProtectedPkiMessageBuilder {
    header: PkiHeader,
    body: PkiBody,
    extra_certs: Vec<Any>,
}

impl ProtectedPkiMessageBuilder {
    pub fn new(header: PkiHeader, body: PkiBody) -> Self {
        Self {
            header,
            body,
            extra_certs: Vec::new(),
        }
    }

    /// Embed a DER-encoded certificate in `extraCerts`
    pub fn add_certificate(mut self, der: &[u8]) -> Result<Self, CmpError> {
        let cert = Any::from_der(der).map_err(CmpError::Decode)?;
        self.extra_certs.push(cert);
        Ok(self)
    }

    /// Protect with a MAC computed by `factory`
    pub fn build_with_mac<F: MacFactory>(self, factory: &F) -> Result<ProtectedPkiMessage, CmpError> {
        let mut message = self.into_message();
        message.header.protection_alg = Some(factory.algorithm_identifier()?);

        let tag = process(message.protected_part(), factory.create_calculator()?)?;
        debug!(len = tag.len(), "Protected message with MAC");

        Self::finish(message, tag.collect())
    }

    /// Protect with a signature produced by `signer`
    pub fn build_with_signer<S: ContentSigner>(
        self,
        signer: &S,
    ) -> Result<ProtectedPkiMessage, CmpError> {
        let mut message = self.into_message();
        message.header.protection_alg = Some(signer.algorithm_identifier());

        let signature = process(message.protected_part(), signer.create_calculator()?)?;
        debug!(len = signature.len(), "Protected message with signature");

        Self::finish(message, &signature)
    }

    fn into_message(self) -> PkiMessage {
        let mut message = PkiMessage::new(self.header, self.body);
        if !self.extra_certs.is_empty() {
            message.extra_certs = Some(self.extra_certs);
        }
        message
    }

    fn finish(mut message: PkiMessage, protection: &[u8]) -> Result<ProtectedPkiMessage, CmpError> {
        message.protection = Some(BitString::from_bytes(protection).map_err(CmpError::Encoding)?);
        ProtectedPkiMessage::new(message)
    }
}
