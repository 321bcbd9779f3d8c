//! Fasta cipher state: five 329-bit words.

use std::fmt;

use crate::error::FastaError;
use crate::random::mask_source::MaskSource;
use crate::utils::bit_vector::BitVector;

/// Width of one state word in bits.
pub const WORD_BITS: usize = 329;

/// Number of words in the state.
pub const STATE_WORDS: usize = 5;

/// Width of the whole state, and of one keystream block.
pub const BLOCK_BITS: usize = WORD_BITS * STATE_WORDS;

/// 1645-bit cipher state held as five 329-bit words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    words: [BitVector; STATE_WORDS],
}

impl State {
    /// Returns the all-zero state.
    pub fn zero() -> Self {
        State {
            words: std::array::from_fn(|_| BitVector::new(WORD_BITS)),
        }
    }

    /// Builds a state from five words.
    ///
    /// # Errors
    /// Returns [`FastaError::LengthMismatch`] if a word is not 329 bits.
    pub fn from_words(words: [BitVector; STATE_WORDS]) -> Result<Self, FastaError> {
        if let Some(bad) = words.iter().find(|w| w.len() != WORD_BITS) {
            return Err(FastaError::LengthMismatch {
                expected: WORD_BITS,
                found: bad.len(),
            });
        }
        Ok(State { words })
    }

    /// Initial state for a key: word `i` is the key rotated left by `i`.
    ///
    /// # Errors
    /// Returns [`FastaError::InvalidKeyLength`] if the key is not 329 bits.
    pub fn from_key(key: &BitVector) -> Result<Self, FastaError> {
        check_key(key)?;
        Ok(State {
            words: std::array::from_fn(|i| key.rotated_left(i)),
        })
    }

    /// Returns the five words.
    pub fn words(&self) -> &[BitVector; STATE_WORDS] {
        &self.words
    }

    pub(crate) fn words_mut(&mut self) -> &mut [BitVector; STATE_WORDS] {
        &mut self.words
    }

    /// XORs a fresh random 329-bit mask from `source` into every word.
    ///
    /// The masks are dropped afterwards.
    pub fn mask<S: MaskSource + ?Sized>(&mut self, source: &mut S) -> Result<(), FastaError> {
        for word in self.words.iter_mut() {
            word.xor_accumulate(&source.next_bits(WORD_BITS))?;
        }
        Ok(())
    }

    /// XORs the key into every word.
    pub fn feed_forward(&mut self, key: &BitVector) -> Result<(), FastaError> {
        check_key(key)?;
        for word in self.words.iter_mut() {
            word.xor_accumulate(key)?;
        }
        Ok(())
    }

    /// Concatenates the words into one 1645-bit vector.
    ///
    /// Word 0 is embedded first and the accumulator is rotated up by one
    /// word width before each following word is XORed in, so word 0 ends
    /// in the most significant 329 bits and word 4 in the least
    /// significant.
    pub fn pack(&self) -> Result<BitVector, FastaError> {
        let mut packed = BitVector::new(BLOCK_BITS);
        let mut scratch = BitVector::new(BLOCK_BITS);
        self.words[0].embed_into(&mut packed)?;
        for word in &self.words[1..] {
            word.embed_into(&mut scratch)?;
            packed.rotate_left(WORD_BITS);
            packed.xor_accumulate(&scratch)?;
        }
        Ok(packed)
    }
}

fn check_key(key: &BitVector) -> Result<(), FastaError> {
    if key.len() != WORD_BITS {
        return Err(FastaError::InvalidKeyLength {
            expected: WORD_BITS,
            found: key.len(),
        });
    }
    Ok(())
}

/// One hex line per word.
impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in &self.words {
            writeln!(f, "{}", word)?;
        }
        Ok(())
    }
}
