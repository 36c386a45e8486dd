//! Operator capabilities for message protection
//!
//! Verification code never holds a concrete algorithm. It asks a factory for
//! a [`StreamCalculator`], writes the protected bytes into it and inspects the
//! result: a [`Verifier`] for signatures, a [`BlockResult`] for MACs.

use der::asn1::ObjectIdentifier;
use pkicmp_protocol::{AlgorithmIdentifierOwned, PbmParameter};
use std::io::Write;
use thiserror::Error;
use zeroize::Zeroizing;

#[cfg(feature = "ecdsa")]
pub mod ecdsa;

pub mod pbm;

pub use pbm::{PkMacBuilder, PkMacCalculator, PkMacFactory};

#[derive(Debug, Error)]
pub enum OperatorError {
    #[error("Unsupported one-way function: {0}")]
    UnsupportedOwf(ObjectIdentifier),

    #[error("Unsupported MAC algorithm: {0}")]
    UnsupportedMac(ObjectIdentifier),

    #[error("Iteration count must be at least {min}, got {got}")]
    IterationCountTooLow { min: u32, got: u32 },

    #[error("Iteration count exceeds limit ({got} > {max})")]
    IterationCountExceedsLimit { max: u32, got: u32 },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] der::Error),
}

/// A byte sink producing a result once all content has been written
pub trait StreamCalculator: Write {
    type Output;

    /// Consume the calculator and produce its result
    fn finish(self) -> Result<Self::Output, OperatorError>;
}

/// Outcome of a signature calculation, checked against a received signature
pub trait Verifier {
    fn is_verified(&self, signature: &[u8]) -> bool;
}

/// Source of signature-verifying calculators
pub trait VerifierFactory {
    type Verifier: Verifier;
    type Calculator: StreamCalculator<Output = Self::Verifier>;

    fn create_calculator(&self) -> Result<Self::Calculator, OperatorError>;
}

/// Raw block output of a MAC or digest calculation
#[derive(Clone)]
pub struct BlockResult(Zeroizing<Vec<u8>>);

impl BlockResult {
    pub fn new(bytes: Vec<u8>) -> Self {
        BlockResult(Zeroizing::new(bytes))
    }

    /// Get a reference to the result bytes
    pub fn collect(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Source of keyed MAC calculators
pub trait MacFactory {
    type Calculator: StreamCalculator<Output = BlockResult>;

    /// Protection algorithm identifier describing this MAC
    fn algorithm_identifier(&self) -> Result<AlgorithmIdentifierOwned, OperatorError>;

    fn create_calculator(&self) -> Result<Self::Calculator, OperatorError>;
}

/// Builds password-keyed MAC factories from PBM parameters
pub trait PasswordMacBuilder {
    type Factory: MacFactory;

    /// Adopt the parameters carried by a received message
    fn set_parameters(&mut self, parameters: &PbmParameter) -> Result<(), OperatorError>;

    /// Derive the MAC key from `password` (UTF-8 for text passwords)
    fn build(&self, password: &[u8]) -> Result<Self::Factory, OperatorError>;
}

/// Produces signatures over streamed content
pub trait ContentSigner {
    type Calculator: StreamCalculator<Output = Vec<u8>>;

    fn algorithm_identifier(&self) -> AlgorithmIdentifierOwned;

    fn create_calculator(&self) -> Result<Self::Calculator, OperatorError>;
}
