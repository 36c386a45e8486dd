//! Unified error type for CMP message protection
//!
//! The cipher and operator crates keep their own error enums. This type is
//! what the message-level API returns, wrapping those where they surface.
//!
//! A protection value that does not verify is reported as `Ok(false)`, never
//! as an error. Errors mean the message or the supplied capability could not
//! be used at all.
//!
//! # Example
//!
//! ```no_run
//! use pkicmp::{CmpError, GeneralPkiMessage, ProtectedPkiMessage};
//!
//! fn load(der: &[u8]) -> Result<ProtectedPkiMessage, CmpError> {
//!     ProtectedPkiMessage::from_general(GeneralPkiMessage::from_der(der)?)
//! }
//! ```

use pkicmp_crypto::OperatorError;
use thiserror::Error;

/// Error type for all message-level operations
///
/// # Error Categories
///
/// - **Configuration**: the message cannot be treated as protected
/// - **InvalidOperation**: the requested verification path does not match the message
/// - **Parameter**: protection algorithm parameters are missing or malformed
/// - **Decode**/**Encoding**: DER failures on input or on canonical re-encoding
/// - **Operator**/**Stream**: failures inside a supplied capability
#[derive(Debug, Error)]
pub enum CmpError {
    /// Message has no protection algorithm
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// MAC verification requested on a non-PBM message
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Missing or malformed protection parameters
    #[error("Parameter error: {0}")]
    Parameter(String),

    /// Malformed message or embedded certificate
    #[error("Decode error: {0}")]
    Decode(der::Error),

    /// Protected part could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(der::Error),

    /// Verifier, MAC or signer failure
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Calculator sink rejected the protected bytes
    #[error("Stream error: {0}")]
    Stream(#[from] std::io::Error),
}

impl CmpError {
    pub(crate) fn not_protected() -> Self {
        Self::Configuration("pki message not protected".to_string())
    }

    pub(crate) fn not_mac_based() -> Self {
        Self::InvalidOperation("protection algorithm is not mac based".to_string())
    }

    /// Returns true if the message could not be treated as protected
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true if the verification path did not match the message
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation(_))
    }

    /// Returns true if input DER could not be decoded
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns true if protection parameters were rejected
    ///
    /// Covers both malformed PBM parameters and parameters the MAC builder
    /// refused (unsupported algorithms, iteration bounds).
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::Parameter(_)
                | Self::Operator(
                    OperatorError::UnsupportedOwf(_)
                        | OperatorError::UnsupportedMac(_)
                        | OperatorError::IterationCountTooLow { .. }
                        | OperatorError::IterationCountExceedsLimit { .. }
                )
        )
    }
}
