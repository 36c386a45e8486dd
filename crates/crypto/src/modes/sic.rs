//! Segmented Integer Counter (SIC) mode, also known as CTR mode
//!
//! Turns any [`BlockCipher`] into a keystream generator: the wrapped cipher
//! encrypts successive counter values and the result is XORed with the
//! input. Encryption and decryption are the same operation.
//!
//! The counter is the whole block, treated as one big-endian integer and
//! seeded with the IV (left-aligned, zero padded). The IV must leave at most
//! 8 bytes of the block to the zero padding. Incrementing wraps silently from
//! all-ones to all-zero, so at most 2^(8·B) blocks may be processed under one
//! IV and key.
//!
//! # Concurrency
//!
//! An engine is one keystream position. Use one engine per stream; do not
//! share one across threads behind a lock.

use crate::cipher::{check_block_len, BlockCipher, CipherError};
use crate::params::CipherParameters;
use tracing::trace;
use zeroize::{Zeroize, Zeroizing};

/// Maximum number of counter bytes not covered by the IV
const MAX_COUNTER_PADDING: usize = 8;

pub struct SicBlockCipher<C: BlockCipher> {
    cipher: C,
    block_size: usize,
    counter: Vec<u8>,
    counter_out: Vec<u8>,
    iv: Option<Vec<u8>>,
}

impl<C: BlockCipher> SicBlockCipher<C> {
    /// Wrap `cipher`; the engine is unusable until [`BlockCipher::init`]
    pub fn new(cipher: C) -> Self {
        let block_size = cipher.block_size();
        Self {
            cipher,
            block_size,
            counter: vec![0u8; block_size],
            counter_out: vec![0u8; block_size],
            iv: None,
        }
    }

    /// The wrapped block cipher
    pub fn underlying_cipher(&self) -> &C {
        &self.cipher
    }

    /// Transform an arbitrary-length buffer
    ///
    /// Full blocks go through [`BlockCipher::process_block`]. A trailing
    /// partial block consumes a whole keystream block of which only the
    /// prefix is used, so a partial block ends the stream for this IV.
    pub fn process_bytes(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CipherError> {
        if output.len() < input.len() {
            return Err(CipherError::BufferTooShort {
                buffer: "output",
                needed: input.len(),
                got: output.len(),
            });
        }

        let block_size = self.block_size;
        let mut block_in = Zeroizing::new(vec![0u8; block_size]);
        let mut block_out = Zeroizing::new(vec![0u8; block_size]);

        for (chunk_in, chunk_out) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
            let len = chunk_in.len();
            if len == block_size {
                self.process_block(chunk_in, chunk_out)?;
            } else {
                block_in[..len].copy_from_slice(chunk_in);
                block_in[len..].fill(0);
                self.process_block(&block_in, &mut block_out)?;
                chunk_out[..len].copy_from_slice(&block_out[..len]);
            }
        }

        Ok(input.len())
    }

    /// Add one to the counter as a big-endian integer spanning the block
    fn increment_counter(&mut self) {
        for byte in self.counter.iter_mut().rev() {
            *byte = byte.wrapping_add(1);
            if *byte != 0 {
                break;
            }
        }
    }
}

impl<C: BlockCipher> BlockCipher for SicBlockCipher<C> {
    fn algorithm_name(&self) -> String {
        format!("{}/CTR", self.cipher.algorithm_name())
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    /// `for_encryption` is ignored: the wrapped cipher always runs forward
    fn init(&mut self, _for_encryption: bool, params: &CipherParameters) -> Result<(), CipherError> {
        let CipherParameters::WithIv(iv_params) = params else {
            return Err(CipherError::MissingIv);
        };

        let iv = iv_params.iv();
        if self.block_size.saturating_sub(iv.len()) > MAX_COUNTER_PADDING {
            return Err(CipherError::IvTooShort {
                min: self.block_size - MAX_COUNTER_PADDING,
                got: iv.len(),
            });
        }
        if iv.len() > self.block_size {
            return Err(CipherError::IvTooLong {
                max: self.block_size,
                got: iv.len(),
            });
        }

        match iv_params.parameters() {
            Some(key) => self.cipher.init(true, key)?,
            None => trace!("CTR init without key parameters, changing IV only"),
        }

        self.iv = Some(iv.to_vec());
        self.reset();
        Ok(())
    }

    fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CipherError> {
        check_block_len("input", input.len(), self.block_size)?;
        check_block_len("output", output.len(), self.block_size)?;

        self.cipher.process_block(&self.counter, &mut self.counter_out)?;

        for ((out, keystream), data) in output
            .iter_mut()
            .zip(self.counter_out.iter())
            .zip(input.iter())
        {
            *out = keystream ^ data;
        }

        self.increment_counter();

        Ok(self.block_size)
    }

    fn reset(&mut self) {
        self.counter.fill(0);
        if let Some(iv) = &self.iv {
            self.counter[..iv.len()].copy_from_slice(iv);
        }
        self.cipher.reset();
    }

    fn is_partial_block_okay(&self) -> bool {
        true
    }
}

impl<C: BlockCipher> Drop for SicBlockCipher<C> {
    fn drop(&mut self) {
        self.counter.zeroize();
        self.counter_out.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{KeyParameter, ParametersWithIv};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Toy cipher of arbitrary block size: XOR with a key byte, then rotate
    struct ToyCipher {
        block_size: usize,
        key: Option<u8>,
        inits: Rc<RefCell<Vec<bool>>>,
        inputs: Rc<RefCell<Vec<Vec<u8>>>>,
        resets: Rc<RefCell<usize>>,
    }

    impl ToyCipher {
        fn new(block_size: usize) -> Self {
            Self {
                block_size,
                key: None,
                inits: Rc::default(),
                inputs: Rc::default(),
                resets: Rc::default(),
            }
        }
    }

    impl BlockCipher for ToyCipher {
        fn algorithm_name(&self) -> String {
            "Toy".to_string()
        }

        fn block_size(&self) -> usize {
            self.block_size
        }

        fn init(&mut self, for_encryption: bool, params: &CipherParameters) -> Result<(), CipherError> {
            let CipherParameters::Key(key) = params else {
                return Err(CipherError::UnsupportedParameters("Toy requires a key"));
            };
            self.key = Some(key.as_slice()[0]);
            self.inits.borrow_mut().push(for_encryption);
            Ok(())
        }

        fn process_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, CipherError> {
            let key = self.key.ok_or(CipherError::NotInitialized)?;
            self.inputs.borrow_mut().push(input[..self.block_size].to_vec());
            for i in 0..self.block_size {
                output[i] = (input[i] ^ key).rotate_left(3).wrapping_add(i as u8);
            }
            Ok(self.block_size)
        }

        fn reset(&mut self) {
            *self.resets.borrow_mut() += 1;
        }
    }

    fn keyed(iv: &[u8]) -> CipherParameters {
        CipherParameters::WithIv(ParametersWithIv::new(
            CipherParameters::Key(KeyParameter::new(&[0xa5])),
            iv,
        ))
    }

    #[test]
    fn test_requires_iv_parameters() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(16));
        let err = ctr
            .init(true, &CipherParameters::Key(KeyParameter::new(&[1])))
            .unwrap_err();
        assert!(matches!(err, CipherError::MissingIv));
        assert!(err.is_parameter_error());
    }

    #[test]
    fn test_iv_length_bounds() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(16));
        assert!(matches!(
            ctr.init(true, &keyed(&[0u8; 7])),
            Err(CipherError::IvTooShort { min: 8, got: 7 })
        ));
        assert!(ctr.init(true, &keyed(&[0u8; 8])).is_ok());
        assert!(ctr.init(true, &keyed(&[0u8; 16])).is_ok());
        assert!(matches!(
            ctr.init(true, &keyed(&[0u8; 17])),
            Err(CipherError::IvTooLong { max: 16, got: 17 })
        ));
    }

    #[test]
    fn test_failed_init_keeps_previous_state() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(16));
        ctr.init(true, &keyed(&[0x11; 16])).unwrap();
        assert!(ctr.init(true, &keyed(&[0x22; 4])).is_err());
        assert_eq!(ctr.counter, vec![0x11; 16]);
    }

    #[test]
    fn test_short_iv_is_left_aligned_and_zero_padded() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(16));
        ctr.init(true, &keyed(&[0xff; 8])).unwrap();

        let mut expected = vec![0xff; 8];
        expected.extend_from_slice(&[0u8; 8]);
        assert_eq!(ctr.counter, expected);
    }

    #[test]
    fn test_key_forwarded_for_encryption_regardless_of_direction() {
        let toy = ToyCipher::new(16);
        let inits = toy.inits.clone();
        let mut ctr = SicBlockCipher::new(toy);

        ctr.init(false, &keyed(&[0u8; 16])).unwrap();
        ctr.init(true, &keyed(&[0u8; 16])).unwrap();

        assert_eq!(*inits.borrow(), vec![true, true]);
    }

    #[test]
    fn test_iv_only_rekey_keeps_key() {
        let toy = ToyCipher::new(16);
        let inits = toy.inits.clone();
        let mut ctr = SicBlockCipher::new(toy);
        ctr.init(true, &keyed(&[0u8; 16])).unwrap();

        let mut first = [0u8; 16];
        ctr.process_block(&[0u8; 16], &mut first).unwrap();

        ctr.init(true, &ParametersWithIv::iv_only(&[0u8; 16]).into())
            .unwrap();
        let mut again = [0u8; 16];
        ctr.process_block(&[0u8; 16], &mut again).unwrap();

        assert_eq!(first, again);
        assert_eq!(inits.borrow().len(), 1);
    }

    #[test]
    fn test_counter_sequence_from_zero_iv() {
        let toy = ToyCipher::new(16);
        let inputs = toy.inputs.clone();
        let mut ctr = SicBlockCipher::new(toy);
        ctr.init(true, &keyed(&[0u8; 16])).unwrap();

        let mut out = [0u8; 16];
        ctr.process_block(&[0u8; 16], &mut out).unwrap();
        ctr.process_block(&[0u8; 16], &mut out).unwrap();

        let mut second = vec![0u8; 16];
        second[15] = 1;
        assert_eq!(*inputs.borrow(), vec![vec![0u8; 16], second]);
    }

    #[test]
    fn test_carry_propagates_from_last_byte() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(4));
        ctr.init(true, &keyed(&[0x01, 0x02, 0xff, 0xff])).unwrap();

        let mut out = [0u8; 4];
        ctr.process_block(&[0u8; 4], &mut out).unwrap();
        assert_eq!(ctr.counter, vec![0x01, 0x03, 0x00, 0x00]);
    }

    #[test]
    fn test_full_wraparound_to_zero() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(4));
        ctr.init(true, &keyed(&[0xff; 4])).unwrap();

        let mut out = [0u8; 4];
        ctr.process_block(&[0u8; 4], &mut out).unwrap();
        assert_eq!(ctr.counter, vec![0u8; 4]);
    }

    #[test]
    fn test_single_byte_block_cycle() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(1));
        ctr.init(true, &keyed(&[0x37])).unwrap();

        let mut keystream = Vec::new();
        let mut out = [0u8; 1];
        for _ in 0..256 {
            ctr.process_block(&[0u8], &mut out).unwrap();
            keystream.push(out[0]);
        }
        assert_eq!(ctr.counter, vec![0x37]);

        ctr.process_block(&[0u8], &mut out).unwrap();
        assert_eq!(out[0], keystream[0]);

        // The toy cipher is a permutation, so every byte appears exactly once
        let mut sorted = keystream.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 256);
    }

    #[test]
    fn test_empty_iv_allowed_for_small_blocks() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(8));
        ctr.init(true, &keyed(&[])).unwrap();
        assert_eq!(ctr.counter, vec![0u8; 8]);
    }

    #[test]
    fn test_output_independent_of_direction() {
        let mut enc = SicBlockCipher::new(ToyCipher::new(16));
        let mut dec = SicBlockCipher::new(ToyCipher::new(16));
        enc.init(true, &keyed(&[3u8; 12])).unwrap();
        dec.init(false, &keyed(&[3u8; 12])).unwrap();

        let input = [0x42u8; 16];
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        assert_eq!(enc.process_block(&input, &mut a).unwrap(), 16);
        assert_eq!(dec.process_block(&input, &mut b).unwrap(), 16);
        assert_eq!(a, b);
        assert_eq!(input, [0x42u8; 16]);
    }

    #[test]
    fn test_writes_exactly_one_block() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(8));
        ctr.init(true, &keyed(&[0u8; 8])).unwrap();

        let mut out = [0xeeu8; 12];
        assert_eq!(ctr.process_block(&[0u8; 12], &mut out).unwrap(), 8);
        assert_eq!(&out[8..], &[0xee; 4]);
    }

    #[test]
    fn test_reset_restarts_keystream_and_resets_cipher() {
        let toy = ToyCipher::new(16);
        let resets = toy.resets.clone();
        let mut ctr = SicBlockCipher::new(toy);
        ctr.init(true, &keyed(&[9u8; 16])).unwrap();

        let mut first = [0u8; 16];
        ctr.process_block(&[0u8; 16], &mut first).unwrap();
        ctr.reset();
        ctr.reset();
        let mut again = [0u8; 16];
        ctr.process_block(&[0u8; 16], &mut again).unwrap();

        assert_eq!(first, again);
        assert_eq!(*resets.borrow(), 3);
    }

    #[test]
    fn test_process_bytes_partial_tail() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(16));
        ctr.init(true, &keyed(&[5u8; 16])).unwrap();

        let plaintext: Vec<u8> = (0u8..37).collect();
        let mut ciphertext = vec![0u8; plaintext.len()];
        assert_eq!(ctr.process_bytes(&plaintext, &mut ciphertext).unwrap(), 37);

        ctr.reset();
        let mut recovered = vec![0u8; plaintext.len()];
        ctr.process_bytes(&ciphertext, &mut recovered).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn test_process_before_init() {
        let mut ctr = SicBlockCipher::new(ToyCipher::new(16));
        let mut out = [0u8; 16];
        assert!(matches!(
            ctr.process_block(&[0u8; 16], &mut out),
            Err(CipherError::NotInitialized)
        ));
    }

    #[test]
    fn test_algorithm_name() {
        let ctr = SicBlockCipher::new(ToyCipher::new(16));
        assert_eq!(ctr.algorithm_name(), "Toy/CTR");
        assert!(ctr.is_partial_block_okay());
        assert_eq!(ctr.underlying_cipher().block_size(), 16);
    }
}
