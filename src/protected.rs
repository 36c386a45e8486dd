//! Verification of protected PKI messages
//!
//! The protection value of a PKI message covers the DER encoding of
//! `SEQUENCE { header, body }`. Both verification paths re-encode that
//! structure, stream it into a calculator obtained from a caller-supplied
//! capability and compare the result against the carried protection value:
//!
//! - [`ProtectedPkiMessage::verify`] for signature-based protection
//! - [`ProtectedPkiMessage::verify_mac`] for password-based MAC protection
//!
//! A mismatch yields `Ok(false)`. Errors are reserved for messages or
//! capabilities that cannot be used at all.

use crate::certs::{CertificateDecoder, X509CertificateDecoder};
use crate::error::CmpError;
use crate::general::GeneralPkiMessage;
use der::Encode;
use pkicmp_crypto::{
    constant_time_eq, MacFactory, PasswordMacBuilder, StreamCalculator, Verifier, VerifierFactory,
};
use pkicmp_protocol::{
    oid, AlgorithmIdentifierOwned, PbmParameter, PkiBody, PkiHeader, PkiMessage,
    ProtectedPart,
};
use std::io::Write;
use tracing::debug;
use x509_cert::Certificate;

/// A PKI message whose header names a protection algorithm
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProtectedPkiMessage {
    message: PkiMessage,
    protection_alg: AlgorithmIdentifierOwned,
}

impl ProtectedPkiMessage {
    /// Wrap a decoded message
    ///
    /// Fails with [`CmpError::Configuration`] when the header carries no
    /// protection algorithm.
    pub fn new(message: PkiMessage) -> Result<Self, CmpError> {
        let protection_alg = message
            .header
            .protection_alg
            .clone()
            .ok_or_else(CmpError::not_protected)?;
        Ok(Self {
            message,
            protection_alg,
        })
    }

    pub fn from_general(message: GeneralPkiMessage) -> Result<Self, CmpError> {
        Self::new(message.into_inner())
    }

    pub fn header(&self) -> &PkiHeader {
        &self.message.header
    }

    pub fn body(&self) -> &PkiBody {
        &self.message.body
    }

    /// The message exactly as it was supplied
    pub fn to_asn1_message(&self) -> &PkiMessage {
        &self.message
    }

    pub fn into_inner(self) -> PkiMessage {
        self.message
    }

    pub fn protection_algorithm(&self) -> &AlgorithmIdentifierOwned {
        &self.protection_alg
    }

    /// Whether the protection algorithm is the password-based MAC
    pub fn has_password_based_mac_protection(&self) -> bool {
        self.protection_algorithm().oid == oid::PASSWORD_BASED_MAC
    }

    /// Embedded certificates decoded as X.509
    pub fn certificates(&self) -> Result<Vec<Certificate>, CmpError> {
        self.certificates_with(&X509CertificateDecoder)
    }

    /// Embedded certificates decoded with `decoder`, empty when none are carried
    pub fn certificates_with<D: CertificateDecoder>(
        &self,
        decoder: &D,
    ) -> Result<Vec<D::Certificate>, CmpError> {
        self.message
            .extra_certs()
            .iter()
            .map(|cert| {
                let der = cert.to_der().map_err(CmpError::Decode)?;
                decoder.decode(&der).map_err(CmpError::Decode)
            })
            .collect()
    }

    /// Check a signature-based protection value
    pub fn verify<F: VerifierFactory>(&self, factory: &F) -> Result<bool, CmpError> {
        debug!(
            algorithm = %self.protection_algorithm().oid,
            "Verifying signature protection"
        );

        let verifier = self.process(factory.create_calculator()?)?;
        let verified = verifier.is_verified(self.message.protection_bytes());

        debug!(verified, "Signature protection checked");
        Ok(verified)
    }

    /// Check a password-based MAC protection value
    ///
    /// The builder adopts the PBM parameters carried by the message before
    /// deriving the key from `password`. Tags are compared in constant time.
    pub fn verify_mac<B: PasswordMacBuilder>(
        &self,
        builder: &mut B,
        password: &[u8],
    ) -> Result<bool, CmpError> {
        if !self.has_password_based_mac_protection() {
            return Err(CmpError::not_mac_based());
        }

        let parameters = self
            .protection_algorithm()
            .parameters
            .as_ref()
            .ok_or_else(|| CmpError::Parameter("missing PBM parameters".to_string()))?;
        let parameters = PbmParameter::from_parameters(parameters)
            .map_err(|e| CmpError::Parameter(format!("malformed PBM parameters: {e}")))?;

        debug!(
            owf = %parameters.owf.oid,
            mac = %parameters.mac.oid,
            iterations = parameters.iteration_count,
            "Verifying MAC protection"
        );

        builder.set_parameters(&parameters)?;
        let factory = builder.build(password)?;
        let tag = self.process(factory.create_calculator()?)?;

        let verified = constant_time_eq(tag.collect(), self.message.protection_bytes());

        debug!(verified, "MAC protection checked");
        Ok(verified)
    }

    fn process<C: StreamCalculator>(&self, calculator: C) -> Result<C::Output, CmpError> {
        process(self.message.protected_part(), calculator)
    }
}

/// Stream the canonical encoding of `part` through `calculator`
pub(crate) fn process<C: StreamCalculator>(
    part: ProtectedPart<'_>,
    mut calculator: C,
) -> Result<C::Output, CmpError> {
    let encoded = part.to_der().map_err(CmpError::Encoding)?;

    calculator.write_all(&encoded)?;
    calculator.flush()?;
    Ok(calculator.finish()?)
}

impl TryFrom<PkiMessage> for ProtectedPkiMessage {
    type Error = CmpError;

    fn try_from(message: PkiMessage) -> Result<Self, CmpError> {
        Self::new(message)
    }
}

impl TryFrom<GeneralPkiMessage> for ProtectedPkiMessage {
    type Error = CmpError;

    fn try_from(message: GeneralPkiMessage) -> Result<Self, CmpError> {
        Self::from_general(message)
    }
}
