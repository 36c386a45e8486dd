//! Decoded PKI message before any protection handling

use crate::error::CmpError;
use der::{Decode, Encode};
use pkicmp_protocol::{PkiBody, PkiHeader, PkiMessage};

/// A PKI message as received, protected or not
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneralPkiMessage {
    message: PkiMessage,
}

impl GeneralPkiMessage {
    pub fn new(message: PkiMessage) -> Self {
        Self { message }
    }

    /// Decode a DER `PKIMessage`
    pub fn from_der(bytes: &[u8]) -> Result<Self, CmpError> {
        PkiMessage::from_der(bytes)
            .map(Self::new)
            .map_err(CmpError::Decode)
    }

    /// Re-encode the message as DER
    pub fn to_der(&self) -> Result<Vec<u8>, CmpError> {
        self.message.to_der().map_err(CmpError::Encoding)
    }

    /// Whether the header names a protection algorithm
    pub fn has_protection(&self) -> bool {
        self.message.header.is_protected()
    }

    pub fn header(&self) -> &PkiHeader {
        &self.message.header
    }

    pub fn body(&self) -> &PkiBody {
        &self.message.body
    }

    pub fn to_asn1_structure(&self) -> &PkiMessage {
        &self.message
    }

    pub fn into_inner(self) -> PkiMessage {
        self.message
    }
}

impl From<PkiMessage> for GeneralPkiMessage {
    fn from(message: PkiMessage) -> Self {
        Self::new(message)
    }
}
