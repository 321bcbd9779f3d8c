//! Fasta: XOR stream cipher over 1645-bit blocks.
//!
//! Each block is XORed with a fresh keystream block. Encryption and
//! decryption are the same operation; they agree only when both sides
//! draw from sources started in the same state.

use tracing::debug;

use crate::error::FastaError;
use crate::keystream::KeystreamGenerator;
use crate::random::mask_source::MaskSource;
use crate::state::BLOCK_BITS;
use crate::utils::bit_vector::BitVector;

/// Fasta stream cipher bound to one key.
///
/// # Examples
///
/// ```
/// use fasta::{BitVector, Fasta, GlibcRandom, BLOCK_BITS, WORD_BITS};
///
/// let mut key = BitVector::new(WORD_BITS);
/// key.set_bit(42).unwrap();
/// let cipher = Fasta::new(key).unwrap();
///
/// let mut block = BitVector::new(BLOCK_BITS);
/// block.set_bit(1000).unwrap();
/// let plaintext = vec![block];
///
/// let ciphertext = cipher
///     .encrypt(&plaintext, &mut GlibcRandom::with_seed(1))
///     .unwrap();
/// assert_ne!(ciphertext, plaintext);
///
/// let decrypted = cipher
///     .decrypt(&ciphertext, &mut GlibcRandom::with_seed(1))
///     .unwrap();
/// assert_eq!(decrypted, plaintext);
/// ```
#[derive(Debug, Clone)]
pub struct Fasta {
    generator: KeystreamGenerator,
}

impl Fasta {
    /// Creates a cipher for a 329-bit key.
    ///
    /// # Errors
    /// Returns [`FastaError::InvalidKeyLength`] if the key is not 329 bits.
    pub fn new(key: BitVector) -> Result<Self, FastaError> {
        Ok(Fasta {
            generator: KeystreamGenerator::new(key)?,
        })
    }

    /// Returns the key.
    pub fn key(&self) -> &BitVector {
        self.generator.key()
    }

    /// Returns the next raw keystream block.
    pub fn keystream_block<S: MaskSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<BitVector, FastaError> {
        self.generator.generate_block(source)
    }

    /// XORs the next keystream block into `block`.
    ///
    /// # Errors
    /// Returns [`FastaError::LengthMismatch`] if `block` is not 1645 bits,
    /// before any randomness is drawn.
    pub fn apply_keystream<S: MaskSource + ?Sized>(
        &self,
        block: &mut BitVector,
        source: &mut S,
    ) -> Result<(), FastaError> {
        check_block(block)?;
        let keystream = self.generator.generate_block(source)?;
        block.xor_accumulate(&keystream)
    }

    /// Encrypts `blocks` in order, one keystream block each.
    ///
    /// # Errors
    /// Returns [`FastaError::LengthMismatch`] if any block is not 1645 bits;
    /// nothing is drawn from `source` in that case.
    pub fn encrypt<S: MaskSource + ?Sized>(
        &self,
        blocks: &[BitVector],
        source: &mut S,
    ) -> Result<Vec<BitVector>, FastaError> {
        debug!(blocks = blocks.len(), source = source.name(), "encrypting");
        self.xor_keystream(blocks, source)
    }

    /// Decrypts `blocks`; `source` must start where the encrypting one did.
    ///
    /// # Errors
    /// Returns [`FastaError::LengthMismatch`] if any block is not 1645 bits;
    /// nothing is drawn from `source` in that case.
    pub fn decrypt<S: MaskSource + ?Sized>(
        &self,
        blocks: &[BitVector],
        source: &mut S,
    ) -> Result<Vec<BitVector>, FastaError> {
        debug!(blocks = blocks.len(), source = source.name(), "decrypting");
        self.xor_keystream(blocks, source)
    }

    fn xor_keystream<S: MaskSource + ?Sized>(
        &self,
        blocks: &[BitVector],
        source: &mut S,
    ) -> Result<Vec<BitVector>, FastaError> {
        for block in blocks {
            check_block(block)?;
        }
        blocks
            .iter()
            .map(|block| {
                let mut out = self.generator.generate_block(source)?;
                out.xor_accumulate(block)?;
                Ok(out)
            })
            .collect()
    }
}

fn check_block(block: &BitVector) -> Result<(), FastaError> {
    if block.len() != BLOCK_BITS {
        return Err(FastaError::LengthMismatch {
            expected: BLOCK_BITS,
            found: block.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::chacha_source::ChaChaSource;
    use crate::random::glibc_random::GlibcRandom;
    use crate::state::WORD_BITS;

    fn key() -> BitVector {
        let mut key = BitVector::new(WORD_BITS);
        for bit in [0, 5, 77, 200, 328] {
            key.set_bit(bit).unwrap();
        }
        key
    }

    fn blocks(n: usize) -> Vec<BitVector> {
        (0..n)
            .map(|i| {
                let mut b = BitVector::new(BLOCK_BITS);
                b.set_bit(i * 97 % BLOCK_BITS).unwrap();
                b.set_bit(1644 - i).unwrap();
                b
            })
            .collect()
    }

    #[test]
    fn test_roundtrip_glibc() {
        let cipher = Fasta::new(key()).unwrap();
        let plaintext = blocks(3);
        let ciphertext = cipher
            .encrypt(&plaintext, &mut GlibcRandom::with_seed(1))
            .unwrap();
        assert_eq!(ciphertext.len(), 3);
        let decrypted = cipher
            .decrypt(&ciphertext, &mut GlibcRandom::with_seed(1))
            .unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_roundtrip_chacha() {
        let cipher = Fasta::new(key()).unwrap();
        let plaintext = blocks(2);
        let ciphertext = cipher
            .encrypt(&plaintext, &mut ChaChaSource::seed_from_u64(9))
            .unwrap();
        let decrypted = cipher
            .decrypt(&ciphertext, &mut ChaChaSource::seed_from_u64(9))
            .unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_wrong_seed_does_not_decrypt() {
        let cipher = Fasta::new(key()).unwrap();
        let plaintext = blocks(1);
        let ciphertext = cipher
            .encrypt(&plaintext, &mut GlibcRandom::with_seed(1))
            .unwrap();
        let decrypted = cipher
            .decrypt(&ciphertext, &mut GlibcRandom::with_seed(2))
            .unwrap();
        assert_ne!(decrypted, plaintext);
    }

    #[test]
    fn test_apply_keystream_matches_encrypt() {
        let cipher = Fasta::new(key()).unwrap();
        let plaintext = blocks(2);
        let ciphertext = cipher
            .encrypt(&plaintext, &mut GlibcRandom::with_seed(4))
            .unwrap();
        let mut source = GlibcRandom::with_seed(4);
        let mut in_place = plaintext.clone();
        for block in in_place.iter_mut() {
            cipher.apply_keystream(block, &mut source).unwrap();
        }
        assert_eq!(in_place, ciphertext);
    }

    #[test]
    fn test_bad_block_consumes_nothing() {
        let cipher = Fasta::new(key()).unwrap();
        let mut input = blocks(2);
        input.push(BitVector::new(1600));
        let mut source = GlibcRandom::with_seed(1);
        assert_eq!(
            cipher.encrypt(&input, &mut source),
            Err(FastaError::LengthMismatch {
                expected: 1645,
                found: 1600
            })
        );
        let mut fresh = GlibcRandom::with_seed(1);
        assert_eq!(source.next_u31(), fresh.next_u31());
    }

    #[test]
    fn test_empty_message() {
        let cipher = Fasta::new(key()).unwrap();
        let out = cipher.encrypt(&[], &mut GlibcRandom::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_rejects_short_key() {
        assert!(Fasta::new(BitVector::new(328)).is_err());
    }
}
