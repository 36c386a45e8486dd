//! Password-based MAC (RFC 4211 §4.4)
//!
//! The MAC key is derived by applying the one-way function `iterationCount`
//! times to `password || salt`; the MAC is then computed under that key over
//! the protected part of the message.

use super::{BlockResult, MacFactory, OperatorError, PasswordMacBuilder, StreamCalculator};
use der::asn1::ObjectIdentifier;
use hmac::{Hmac, Mac};
use pkicmp_protocol::{oid, AlgorithmIdentifierOwned, PbmParameter};
use rand::{rngs::OsRng, RngCore};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::io::{self, Write};
use tracing::{debug, warn};
use zeroize::Zeroizing;

pub const DEFAULT_ITERATION_COUNT: u32 = 1000;
pub const MIN_ITERATION_COUNT: u32 = 100;
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;
pub const DEFAULT_SALT_LENGTH: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OneWayFunction {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl OneWayFunction {
    fn from_oid(id: &ObjectIdentifier) -> Result<Self, OperatorError> {
        [Self::Sha1, Self::Sha256, Self::Sha384, Self::Sha512]
            .into_iter()
            .find(|owf| owf.oid() == *id)
            .ok_or(OperatorError::UnsupportedOwf(*id))
    }

    fn oid(self) -> ObjectIdentifier {
        match self {
            Self::Sha1 => oid::ID_SHA1,
            Self::Sha256 => oid::ID_SHA256,
            Self::Sha384 => oid::ID_SHA384,
            Self::Sha512 => oid::ID_SHA512,
        }
    }

    fn digest(self, data: &[u8]) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(match self {
            Self::Sha1 => Sha1::digest(data).to_vec(),
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MacAlgorithm {
    HmacSha1,
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

impl MacAlgorithm {
    fn from_oid(id: &ObjectIdentifier) -> Result<Self, OperatorError> {
        [
            Self::HmacSha1,
            Self::HmacSha256,
            Self::HmacSha384,
            Self::HmacSha512,
        ]
        .into_iter()
        .find(|mac| mac.oid() == *id)
        .ok_or(OperatorError::UnsupportedMac(*id))
    }

    fn oid(self) -> ObjectIdentifier {
        match self {
            Self::HmacSha1 => oid::HMAC_SHA1,
            Self::HmacSha256 => oid::HMAC_WITH_SHA256,
            Self::HmacSha384 => oid::HMAC_WITH_SHA384,
            Self::HmacSha512 => oid::HMAC_WITH_SHA512,
        }
    }
}

enum MacState {
    HmacSha1(Hmac<Sha1>),
    HmacSha256(Hmac<Sha256>),
    HmacSha384(Hmac<Sha384>),
    HmacSha512(Hmac<Sha512>),
}

impl MacState {
    fn new(algorithm: MacAlgorithm, key: &[u8]) -> Result<Self, OperatorError> {
        let invalid = |_| OperatorError::InvalidKey("HMAC key rejected".to_string());
        match algorithm {
            MacAlgorithm::HmacSha1 => Hmac::new_from_slice(key).map(Self::HmacSha1).map_err(invalid),
            MacAlgorithm::HmacSha256 => Hmac::new_from_slice(key)
                .map(Self::HmacSha256)
                .map_err(invalid),
            MacAlgorithm::HmacSha384 => Hmac::new_from_slice(key)
                .map(Self::HmacSha384)
                .map_err(invalid),
            MacAlgorithm::HmacSha512 => Hmac::new_from_slice(key)
                .map(Self::HmacSha512)
                .map_err(invalid),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::HmacSha1(mac) => mac.update(data),
            Self::HmacSha256(mac) => mac.update(data),
            Self::HmacSha384(mac) => mac.update(data),
            Self::HmacSha512(mac) => mac.update(data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            Self::HmacSha1(mac) => mac.finalize().into_bytes().to_vec(),
            Self::HmacSha256(mac) => mac.finalize().into_bytes().to_vec(),
            Self::HmacSha384(mac) => mac.finalize().into_bytes().to_vec(),
            Self::HmacSha512(mac) => mac.finalize().into_bytes().to_vec(),
        }
    }
}

fn algorithm(oid: ObjectIdentifier) -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid,
        parameters: None,
    }
}

/// Builder for password-based MAC factories
///
/// Defaults: SHA-1 one-way function, HMAC-SHA1, 1000 iterations and a fresh
/// 20 byte salt per [`build`](PasswordMacBuilder::build). Parameters taken
/// from a received message replace all of these, but their iteration count
/// is capped by [`with_max_iterations`](Self::with_max_iterations).
#[derive(Clone, Debug)]
pub struct PkMacBuilder {
    owf: OneWayFunction,
    mac: MacAlgorithm,
    iteration_count: u32,
    salt_length: usize,
    max_iterations: u32,
    salt: Option<Vec<u8>>,
}

impl Default for PkMacBuilder {
    fn default() -> Self {
        Self {
            owf: OneWayFunction::Sha1,
            mac: MacAlgorithm::HmacSha1,
            iteration_count: DEFAULT_ITERATION_COUNT,
            salt_length: DEFAULT_SALT_LENGTH,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            salt: None,
        }
    }
}

impl PkMacBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owf(mut self, owf: &ObjectIdentifier) -> Result<Self, OperatorError> {
        self.owf = OneWayFunction::from_oid(owf)?;
        Ok(self)
    }

    pub fn with_mac(mut self, mac: &ObjectIdentifier) -> Result<Self, OperatorError> {
        self.mac = MacAlgorithm::from_oid(mac)?;
        Ok(self)
    }

    pub fn with_iteration_count(mut self, iteration_count: u32) -> Result<Self, OperatorError> {
        if iteration_count < MIN_ITERATION_COUNT {
            return Err(OperatorError::IterationCountTooLow {
                min: MIN_ITERATION_COUNT,
                got: iteration_count,
            });
        }
        self.check_iteration_ceiling(iteration_count)?;
        self.iteration_count = iteration_count;
        Ok(self)
    }

    pub fn with_salt_length(mut self, salt_length: usize) -> Self {
        self.salt_length = salt_length;
        self
    }

    /// Upper bound on iteration counts accepted from received parameters
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn check_iteration_ceiling(&self, iteration_count: u32) -> Result<(), OperatorError> {
        if iteration_count > self.max_iterations {
            warn!(
                iteration_count,
                max_iterations = self.max_iterations,
                "PBM iteration count exceeds limit"
            );
            return Err(OperatorError::IterationCountExceedsLimit {
                max: self.max_iterations,
                got: iteration_count,
            });
        }
        Ok(())
    }
}

impl PasswordMacBuilder for PkMacBuilder {
    type Factory = PkMacFactory;

    fn set_parameters(&mut self, parameters: &PbmParameter) -> Result<(), OperatorError> {
        let owf = OneWayFunction::from_oid(&parameters.owf.oid)?;
        let mac = MacAlgorithm::from_oid(&parameters.mac.oid)?;
        if parameters.iteration_count == 0 {
            return Err(OperatorError::IterationCountTooLow {
                min: 1,
                got: 0,
            });
        }
        self.check_iteration_ceiling(parameters.iteration_count)?;

        self.owf = owf;
        self.mac = mac;
        self.iteration_count = parameters.iteration_count;
        self.salt = Some(parameters.salt.as_bytes().to_vec());
        Ok(())
    }

    fn build(&self, password: &[u8]) -> Result<PkMacFactory, OperatorError> {
        self.check_iteration_ceiling(self.iteration_count)?;

        let salt = match &self.salt {
            Some(salt) => salt.clone(),
            None => {
                let mut salt = vec![0u8; self.salt_length];
                OsRng.fill_bytes(&mut salt);
                salt
            }
        };

        debug!(
            owf = %self.owf.oid(),
            mac = %self.mac.oid(),
            iteration_count = self.iteration_count,
            "deriving PBM key"
        );

        let mut base_key = Zeroizing::new(Vec::with_capacity(password.len() + salt.len()));
        base_key.extend_from_slice(password);
        base_key.extend_from_slice(&salt);

        let mut key = self.owf.digest(&base_key);
        for _ in 1..self.iteration_count {
            key = self.owf.digest(&key);
        }

        let parameters = PbmParameter::new(
            &salt,
            algorithm(self.owf.oid()),
            self.iteration_count,
            algorithm(self.mac.oid()),
        )?;

        Ok(PkMacFactory {
            key,
            mac: self.mac,
            parameters,
        })
    }
}

/// MAC factory keyed with a password-derived key
pub struct PkMacFactory {
    key: Zeroizing<Vec<u8>>,
    mac: MacAlgorithm,
    parameters: PbmParameter,
}

impl PkMacFactory {
    /// Parameters the key was derived with
    pub fn parameters(&self) -> &PbmParameter {
        &self.parameters
    }
}

impl MacFactory for PkMacFactory {
    type Calculator = PkMacCalculator;

    fn algorithm_identifier(&self) -> Result<AlgorithmIdentifierOwned, OperatorError> {
        Ok(self.parameters.to_algorithm_identifier()?)
    }

    fn create_calculator(&self) -> Result<PkMacCalculator, OperatorError> {
        Ok(PkMacCalculator {
            state: MacState::new(self.mac, &self.key)?,
        })
    }
}

pub struct PkMacCalculator {
    state: MacState,
}

impl Write for PkMacCalculator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.state.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StreamCalculator for PkMacCalculator {
    type Output = BlockResult;

    fn finish(self) -> Result<BlockResult, OperatorError> {
        Ok(BlockResult::new(self.state.finalize()))
    }
}
