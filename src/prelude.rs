//! pkicmp Prelude
//!
//! The prelude module provides a convenient way to import commonly used types and traits.
//!
//! # Example
//!
//! ```rust
//! use pkicmp::prelude::*;
//!
//! # fn example(der: &[u8]) -> Result<bool, CmpError> {
//! let message = ProtectedPkiMessage::from_general(GeneralPkiMessage::from_der(der)?)?;
//! // Builder and verification traits are in scope
//! message.verify_mac(&mut PkMacBuilder::new(), b"shared secret")
//! # }
//! ```

// Re-export core types
pub use crate::builder::ProtectedPkiMessageBuilder;
pub use crate::certs::{CertificateDecoder, X509CertificateDecoder};
pub use crate::error::CmpError;
pub use crate::general::GeneralPkiMessage;
pub use crate::protected::ProtectedPkiMessage;

// Re-export protocol types
pub use pkicmp_protocol::{AlgorithmIdentifierOwned, PbmParameter, PkiBody, PkiHeader, PkiMessage};

// Re-export capability traits so their methods are callable
pub use pkicmp_crypto::{
    BlockCipher, ContentSigner, MacFactory, PasswordMacBuilder, StreamCalculator, Verifier,
    VerifierFactory,
};

// Re-export the bundled capabilities
pub use pkicmp_crypto::{AesEngine, CipherParameters, PkMacBuilder, SicBlockCipher};

#[cfg(feature = "ecdsa")]
pub use pkicmp_crypto::{EcdsaP256ContentSigner, EcdsaP256VerifierFactory};
