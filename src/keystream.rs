//! Keystream generation: one 1645-bit block per call.
//!
//! The key is expanded into five rotated copies, passed through an initial
//! random linear layer and affine mask, then through six rounds of Chi,
//! random linear layer and affine mask. The key is fed forward into the
//! final state before the five words are packed into one block.

use tracing::trace;

use crate::chi::chi;
use crate::error::FastaError;
use crate::linear::linear_transformation;
use crate::random::mask_source::MaskSource;
use crate::rotation::RotationSchedule;
use crate::state::{State, WORD_BITS};
use crate::utils::bit_vector::BitVector;

/// Number of Chi rounds after the initial affine layer.
pub const ROUNDS: usize = 6;

/// Produces keystream blocks for a fixed key.
///
/// Every block consumes, in order: one 63-bit draw and five 329-bit masks
/// for the initial layer, then the same for each of the six rounds.
#[derive(Debug, Clone)]
pub struct KeystreamGenerator {
    key: BitVector,
}

impl KeystreamGenerator {
    /// Creates a generator for a 329-bit key.
    ///
    /// # Errors
    /// Returns [`FastaError::InvalidKeyLength`] if the key is not 329 bits.
    pub fn new(key: BitVector) -> Result<Self, FastaError> {
        if key.len() != WORD_BITS {
            return Err(FastaError::InvalidKeyLength {
                expected: WORD_BITS,
                found: key.len(),
            });
        }
        Ok(KeystreamGenerator { key })
    }

    /// Returns the key.
    pub fn key(&self) -> &BitVector {
        &self.key
    }

    /// Generates the next keystream block, drawing randomness from `source`.
    pub fn generate_block<S: MaskSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<BitVector, FastaError> {
        let state = State::from_key(&self.key)?;
        let mut state = Self::affine_layer(&state, source, 0)?;

        for round in 1..=ROUNDS {
            state = Self::affine_layer(&chi(&state)?, source, round)?;
        }

        state.feed_forward(&self.key)?;
        state.pack()
    }

    /// Random linear layer followed by a random mask.
    fn affine_layer<S: MaskSource + ?Sized>(
        state: &State,
        source: &mut S,
        round: usize,
    ) -> Result<State, FastaError> {
        let schedule = RotationSchedule::draw(source);
        trace!(round, %schedule, "affine layer");
        let mut out = linear_transformation(state, &schedule)?;
        out.mask(source)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::chacha_source::ChaChaSource;
    use crate::random::glibc_random::GlibcRandom;
    use crate::state::BLOCK_BITS;

    /// Draws nothing but zeros.
    struct ZeroSource {
        requested: Vec<usize>,
    }

    impl MaskSource for ZeroSource {
        fn next_bits(&mut self, length: usize) -> BitVector {
            self.requested.push(length);
            BitVector::new(length)
        }
    }

    fn key_bit0() -> BitVector {
        let mut key = BitVector::new(WORD_BITS);
        key.set_bit(0).unwrap();
        key
    }

    #[test]
    fn test_rejects_wrong_key_length() {
        assert_eq!(
            KeystreamGenerator::new(BitVector::new(64)).unwrap_err(),
            FastaError::InvalidKeyLength {
                expected: 329,
                found: 64
            }
        );
    }

    #[test]
    fn test_draw_order() {
        let generator = KeystreamGenerator::new(key_bit0()).unwrap();
        let mut source = ZeroSource {
            requested: Vec::new(),
        };
        let block = generator.generate_block(&mut source).unwrap();
        assert_eq!(block.len(), BLOCK_BITS);

        let mut expected = Vec::new();
        for _ in 0..=ROUNDS {
            expected.push(63);
            expected.extend([329; 5]);
        }
        assert_eq!(source.requested, expected);
    }

    #[test]
    fn test_zero_source_known_answer() {
        let generator = KeystreamGenerator::new(key_bit0()).unwrap();
        let mut source = ZeroSource {
            requested: Vec::new(),
        };
        let block = generator.generate_block(&mut source).unwrap();
        assert_eq!(
            format!("{}", block),
            "00000705 2f5eec8a 97dde463 7e4bc5f2 dd5d051e e96bb08f b8ac46e4 4028230d \
             c6530a33 699ade03 bbcc4751 d2bcba56 e2fb6329 ce47c844 37226988 9085584b \
             a7ede770 84fe424e 74356b04 b3258f67 7777c367 29b5654c 73b887c5 f43040ad \
             2fe8ac9b aa30eea9 2b105759 8aa83d74 ce5e9a7d 45e3c848 24443a07 5c398327 \
             06f05e74 5bd662f3 fd043e83 dd936194 47b1b71b 6dbc8580 7da2977e 3c6db4ea \
             d96e0a45 4f2058cb 0630e0ae 8666ad62 5f33273b 5c6cb99b b49b97c8 e8bf5ea1 \
             268b3cac 1b15a1bb 7181b6dc 67e050f5"
        );
    }

    #[test]
    fn test_same_seed_same_block() {
        let generator = KeystreamGenerator::new(key_bit0()).unwrap();
        let mut a = ChaChaSource::seed_from_u64(11);
        let mut b = ChaChaSource::seed_from_u64(11);
        assert_eq!(
            generator.generate_block(&mut a).unwrap(),
            generator.generate_block(&mut b).unwrap()
        );
    }

    #[test]
    fn test_consecutive_blocks_differ() {
        let generator = KeystreamGenerator::new(key_bit0()).unwrap();
        let mut source = GlibcRandom::with_seed(1);
        let first = generator.generate_block(&mut source).unwrap();
        let second = generator.generate_block(&mut source).unwrap();
        assert_ne!(first, second);
    }
}
