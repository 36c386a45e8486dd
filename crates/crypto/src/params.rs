//! Cipher parameters

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Raw symmetric key that zeroizes on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyParameter(Vec<u8>);

impl KeyParameter {
    pub fn new(key: &[u8]) -> Self {
        KeyParameter(key.to_vec())
    }

    /// Get a reference to the key bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for KeyParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyParameter([REDACTED; {}])", self.0.len())
    }
}

/// IV plus optional nested parameters (usually the key)
///
/// Without nested parameters, initialising a mode only changes the IV and
/// leaves the underlying cipher's key schedule in place.
#[derive(Clone, Debug)]
pub struct ParametersWithIv {
    iv: Vec<u8>,
    parameters: Option<Box<CipherParameters>>,
}

impl ParametersWithIv {
    pub fn new(parameters: CipherParameters, iv: &[u8]) -> Self {
        Self {
            iv: iv.to_vec(),
            parameters: Some(Box::new(parameters)),
        }
    }

    /// IV-only parameters
    pub fn iv_only(iv: &[u8]) -> Self {
        Self {
            iv: iv.to_vec(),
            parameters: None,
        }
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn parameters(&self) -> Option<&CipherParameters> {
        self.parameters.as_deref()
    }
}

#[derive(Clone, Debug)]
pub enum CipherParameters {
    Key(KeyParameter),
    WithIv(ParametersWithIv),
}

impl CipherParameters {
    /// Key plus IV, the usual shape for stream modes
    pub fn key_with_iv(key: &[u8], iv: &[u8]) -> Self {
        CipherParameters::WithIv(ParametersWithIv::new(
            CipherParameters::Key(KeyParameter::new(key)),
            iv,
        ))
    }
}

impl From<KeyParameter> for CipherParameters {
    fn from(key: KeyParameter) -> Self {
        CipherParameters::Key(key)
    }
}

impl From<ParametersWithIv> for CipherParameters {
    fn from(params: ParametersWithIv) -> Self {
        CipherParameters::WithIv(params)
    }
}
