//! AES block cipher adapter
//!
//! Wraps the RustCrypto `aes` crate behind [`BlockCipher`]; the key size
//! (128, 192 or 256 bits) is chosen by the length of the key passed to `init`.

use crate::cipher::{check_block_len, BlockCipher, CipherError};
use crate::params::CipherParameters;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256, Block};

pub const AES_BLOCK_SIZE: usize = 16;

enum AesKeySchedule {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

impl AesKeySchedule {
    fn new(key: &[u8]) -> Result<Self, CipherError> {
        let invalid = |_| CipherError::InvalidKeyLength(key.len());
        match key.len() {
            16 => Aes128::new_from_slice(key).map(Self::Aes128).map_err(invalid),
            24 => Aes192::new_from_slice(key).map(Self::Aes192).map_err(invalid),
            32 => Aes256::new_from_slice(key).map(Self::Aes256).map_err(invalid),
            other => Err(CipherError::InvalidKeyLength(other)),
        }
    }

    fn encrypt(&self, block: &mut Block) {
        match self {
            Self::Aes128(c) => c.encrypt_block(block),
            Self::Aes192(c) => c.encrypt_block(block),
            Self::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt(&self, block: &mut Block) {
        match self {
            Self::Aes128(c) => c.decrypt_block(block),
            Self::Aes192(c) => c.decrypt_block(block),
            Self::Aes256(c) => c.decrypt_block(block),
        }
    }
}

/// AES engine; must be initialised with a raw key
#[derive(Default)]
pub struct AesEngine {
    schedule: Option<AesKeySchedule>,
    for_encryption: bool,
}

impl AesEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockCipher for AesEngine {
    fn algorithm_name(&self) -> String {
        "AES".to_string()
    }

    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn init(
        &mut self,
        for_encryption: bool,
        params: &CipherParameters,
    ) -> Result<(), CipherError> {
        let CipherParameters::Key(key) = params else {
            return Err(CipherError::UnsupportedParameters(
                "AES requires a KeyParameter",
            ));
        };
        self.schedule = Some(AesKeySchedule::new(key.as_slice())?);
        self.for_encryption = for_encryption;
        Ok(())
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CipherError> {
        let schedule = self.schedule.as_ref().ok_or(CipherError::NotInitialized)?;
        check_block_len("input", input.len(), AES_BLOCK_SIZE)?;
        check_block_len("output", output.len(), AES_BLOCK_SIZE)?;

        let mut block = Block::clone_from_slice(&input[..AES_BLOCK_SIZE]);
        if self.for_encryption {
            schedule.encrypt(&mut block);
        } else {
            schedule.decrypt(&mut block);
        }
        output[..AES_BLOCK_SIZE].copy_from_slice(&block);

        Ok(AES_BLOCK_SIZE)
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::KeyParameter;

    // FIPS-197 Appendix C.1
    const KEY: &str = "000102030405060708090a0b0c0d0e0f";
    const PLAINTEXT: &str = "00112233445566778899aabbccddeeff";
    const CIPHERTEXT: &str = "69c4e0d86a7b0430d8cdb78070b4c55a";

    fn engine(for_encryption: bool) -> AesEngine {
        let mut engine = AesEngine::new();
        let key = KeyParameter::new(&hex::decode(KEY).unwrap());
        engine
            .init(for_encryption, &CipherParameters::Key(key))
            .unwrap();
        engine
    }

    #[test]
    fn test_fips197_encrypt() {
        let mut out = [0u8; 16];
        let n = engine(true)
            .process_block(&hex::decode(PLAINTEXT).unwrap(), &mut out)
            .unwrap();
        assert_eq!(n, 16);
        assert_eq!(hex::encode(out), CIPHERTEXT);
    }

    #[test]
    fn test_fips197_decrypt() {
        let mut out = [0u8; 16];
        engine(false)
            .process_block(&hex::decode(CIPHERTEXT).unwrap(), &mut out)
            .unwrap();
        assert_eq!(hex::encode(out), PLAINTEXT);
    }

    #[test]
    fn test_uninitialised_engine() {
        let mut out = [0u8; 16];
        let err = AesEngine::new().process_block(&[0u8; 16], &mut out);
        assert!(matches!(err, Err(CipherError::NotInitialized)));
    }

    #[test]
    fn test_invalid_key_length() {
        let mut engine = AesEngine::new();
        let err = engine
            .init(true, &CipherParameters::Key(KeyParameter::new(&[0u8; 15])))
            .unwrap_err();
        assert!(matches!(err, CipherError::InvalidKeyLength(15)));
        assert!(err.is_parameter_error());
    }

    #[test]
    fn test_short_buffers() {
        let mut out = [0u8; 16];
        let err = engine(true).process_block(&[0u8; 15], &mut out).unwrap_err();
        assert!(matches!(
            err,
            CipherError::BufferTooShort {
                buffer: "input",
                ..
            }
        ));
    }
}
