//! Password-based MAC parameters (RFC 4211 §4.4)

use crate::oid;
use der::asn1::{Any, OctetString};
use der::{Decode, Encode, Sequence};
use spki::AlgorithmIdentifierOwned;

/// ```text
/// PBMParameter ::= SEQUENCE {
///     salt                OCTET STRING,
///     owf                 AlgorithmIdentifier,
///     iterationCount      INTEGER,
///     mac                 AlgorithmIdentifier }
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct PbmParameter {
    pub salt: OctetString,
    pub owf: AlgorithmIdentifierOwned,
    pub iteration_count: u32,
    pub mac: AlgorithmIdentifierOwned,
}

impl PbmParameter {
    pub fn new(
        salt: &[u8],
        owf: AlgorithmIdentifierOwned,
        iteration_count: u32,
        mac: AlgorithmIdentifierOwned,
    ) -> der::Result<Self> {
        Ok(Self {
            salt: OctetString::new(salt)?,
            owf,
            iteration_count,
            mac,
        })
    }

    /// Parse from the `parameters` field of a protection algorithm identifier
    pub fn from_parameters(parameters: &Any) -> der::Result<Self> {
        Self::from_der(&parameters.to_der()?)
    }

    /// Protection algorithm identifier carrying these parameters
    pub fn to_algorithm_identifier(&self) -> der::Result<AlgorithmIdentifierOwned> {
        Ok(AlgorithmIdentifierOwned {
            oid: oid::PASSWORD_BASED_MAC,
            parameters: Some(Any::from_der(&self.to_der()?)?),
        })
    }
}
