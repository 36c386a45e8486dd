//! ECDSA P-256 signature operators
//!
//! Signatures are DER encoded `ECDSA-Sig-Value`s over SHA-256, as used for
//! `ecdsa-with-SHA256` protected CMP messages.

use super::{ContentSigner, OperatorError, StreamCalculator, Verifier, VerifierFactory};
use p256::ecdsa::signature::{Signer, Verifier as _};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use pkicmp_protocol::{oid, AlgorithmIdentifierOwned};
use std::io::{self, Write};

fn ecdsa_with_sha256() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: oid::ECDSA_WITH_SHA256,
        parameters: None,
    }
}

/// Verifies P-256 signatures under a fixed public key
#[derive(Clone, Debug)]
pub struct EcdsaP256VerifierFactory {
    key: VerifyingKey,
}

impl EcdsaP256VerifierFactory {
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Create from a SEC1 encoded public key (compressed or uncompressed)
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, OperatorError> {
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| OperatorError::InvalidKey(e.to_string()))?;
        Ok(Self { key })
    }
}

impl VerifierFactory for EcdsaP256VerifierFactory {
    type Verifier = EcdsaP256Verifier;
    type Calculator = EcdsaP256VerifierCalculator;

    fn create_calculator(&self) -> Result<Self::Calculator, OperatorError> {
        Ok(EcdsaP256VerifierCalculator {
            key: self.key.clone(),
            content: Vec::new(),
        })
    }
}

pub struct EcdsaP256VerifierCalculator {
    key: VerifyingKey,
    content: Vec<u8>,
}

impl Write for EcdsaP256VerifierCalculator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.content.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StreamCalculator for EcdsaP256VerifierCalculator {
    type Output = EcdsaP256Verifier;

    fn finish(self) -> Result<EcdsaP256Verifier, OperatorError> {
        Ok(EcdsaP256Verifier {
            key: self.key,
            content: self.content,
        })
    }
}

pub struct EcdsaP256Verifier {
    key: VerifyingKey,
    content: Vec<u8>,
}

impl Verifier for EcdsaP256Verifier {
    fn is_verified(&self, signature: &[u8]) -> bool {
        match Signature::from_der(signature) {
            Ok(signature) => self.key.verify(&self.content, &signature).is_ok(),
            Err(_) => false,
        }
    }
}

/// Signs content with a P-256 private key
pub struct EcdsaP256ContentSigner {
    key: SigningKey,
}

impl EcdsaP256ContentSigner {
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }
}

impl ContentSigner for EcdsaP256ContentSigner {
    type Calculator = EcdsaP256SignerCalculator;

    fn algorithm_identifier(&self) -> AlgorithmIdentifierOwned {
        ecdsa_with_sha256()
    }

    fn create_calculator(&self) -> Result<Self::Calculator, OperatorError> {
        Ok(EcdsaP256SignerCalculator {
            key: self.key.clone(),
            content: Vec::new(),
        })
    }
}

pub struct EcdsaP256SignerCalculator {
    key: SigningKey,
    content: Vec<u8>,
}

impl Write for EcdsaP256SignerCalculator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.content.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StreamCalculator for EcdsaP256SignerCalculator {
    type Output = Vec<u8>;

    fn finish(self) -> Result<Vec<u8>, OperatorError> {
        let signature: Signature = self
            .key
            .try_sign(&self.content)
            .map_err(|e| OperatorError::SigningFailed(e.to_string()))?;
        Ok(signature.to_der().as_bytes().to_vec())
    }
}
