//! Block cipher capability
//!
//! Concrete algorithms stay outside the modes that drive them: a mode owns a
//! `BlockCipher` and only ever talks to it through this trait.

use crate::params::CipherParameters;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("CTR mode requires ParametersWithIv")]
    MissingIv,

    #[error("CTR mode requires IV of at least: {min} bytes, got {got}")]
    IvTooShort { min: usize, got: usize },

    #[error("CTR mode requires IV no greater than: {max} bytes, got {got}")]
    IvTooLong { max: usize, got: usize },

    #[error("Invalid key length: {0} bytes")]
    InvalidKeyLength(usize),

    #[error("Unsupported parameters: {0}")]
    UnsupportedParameters(&'static str),

    #[error("{buffer} buffer too short: need {needed} bytes, got {got}")]
    BufferTooShort {
        buffer: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("Cipher not initialised")]
    NotInitialized,
}

impl CipherError {
    /// Returns true if the error was caused by the parameters passed to `init`
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Self::MissingIv
                | Self::IvTooShort { .. }
                | Self::IvTooLong { .. }
                | Self::InvalidKeyLength(_)
                | Self::UnsupportedParameters(_)
        )
    }
}

/// A block cipher primitive
pub trait BlockCipher {
    /// Algorithm name, e.g. `AES`
    fn algorithm_name(&self) -> String;

    /// Block size in bytes
    fn block_size(&self) -> usize;

    /// Initialise the cipher for encryption (`true`) or decryption (`false`)
    fn init(&mut self, for_encryption: bool, params: &CipherParameters)
        -> Result<(), CipherError>;

    /// Process one block from the front of `input` into the front of `output`
    ///
    /// Both buffers must hold at least `block_size()` bytes. Returns the
    /// number of bytes written.
    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CipherError>;

    /// Reset internal non-key state
    fn reset(&mut self);

    /// Whether the caller may use only a prefix of the last output block
    fn is_partial_block_okay(&self) -> bool {
        false
    }
}

/// Check that `buffer` can hold one block
pub(crate) fn check_block_len(
    buffer: &'static str,
    len: usize,
    block_size: usize,
) -> Result<(), CipherError> {
    if len < block_size {
        return Err(CipherError::BufferTooShort {
            buffer,
            needed: block_size,
            got: len,
        });
    }
    Ok(())
}
