//! CMP Cryptographic Operations
//!
//! This crate provides the cryptographic building blocks used around CMP
//! message protection:
//! - A block cipher capability trait and an AES adapter
//! - Counter (SIC/CTR) mode over any block cipher
//! - Operator capabilities (stream calculators, verifiers, MAC factories)
//! - Password-based MAC (RFC 4211) and ECDSA P-256 operators
//!
//! # Security Features
//!
//! - **Zeroization**: keys, derived MAC keys and CTR keystream buffers are cleared on drop
//! - **Constant-time comparison**: tag checks use [`ct::constant_time_eq`], built on `subtle`
//!
//! # Example
//!
//! ```
//! use pkicmp_crypto::{AesEngine, BlockCipher, CipherParameters, SicBlockCipher};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ctr = SicBlockCipher::new(AesEngine::new());
//! ctr.init(true, &CipherParameters::key_with_iv(&[0u8; 16], &[0u8; 16]))?;
//!
//! let data = b"counter mode needs no padding";
//! let mut encrypted = vec![0u8; data.len()];
//! ctr.process_bytes(data, &mut encrypted)?;
//!
//! // Same keystream again after a reset
//! ctr.reset();
//! let mut decrypted = vec![0u8; data.len()];
//! ctr.process_bytes(&encrypted, &mut decrypted)?;
//! assert_eq!(data.as_slice(), decrypted.as_slice());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod cipher;
pub mod ct;
pub mod engines;
pub mod modes;
pub mod operator;
pub mod params;

// Re-export commonly used types
pub use cipher::{BlockCipher, CipherError};
pub use ct::constant_time_eq;
pub use engines::AesEngine;
pub use modes::SicBlockCipher;
pub use operator::{
    BlockResult, ContentSigner, MacFactory, OperatorError, PasswordMacBuilder, PkMacBuilder,
    PkMacFactory, StreamCalculator, Verifier, VerifierFactory,
};
pub use params::{CipherParameters, KeyParameter, ParametersWithIv};

#[cfg(feature = "ecdsa")]
pub use operator::ecdsa::{EcdsaP256ContentSigner, EcdsaP256VerifierFactory};

// Re-export the curve crate so callers can construct keys
#[cfg(feature = "ecdsa")]
pub use p256;
