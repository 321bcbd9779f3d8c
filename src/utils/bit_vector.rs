//! Fixed-length boolean vectors packed into 32-bit words.
//!
//! Bit `i` lives in word `i / 32` at position `i % 32`. Bits at or above
//! the logical length are always zero. Each vector also carries an
//! auxiliary constant bit that follows the same AND/XOR/OR algebra as the
//! content, so a vector can stand for "content plus a constant".

use std::fmt;

use itertools::Itertools;
use num_bigint::BigUint;

use crate::error::FastaError;
use crate::random::mask_source::MaskSource;

/// Number of bits in one physical word.
pub const WORD_SIZE: usize = 32;

/// Number of physical words needed to hold `length` bits.
pub(crate) fn word_count(length: usize) -> usize {
    length.div_ceil(WORD_SIZE)
}

/// Fixed-length bit vector with an auxiliary constant bit.
///
/// Two vectors are equal when their lengths, contents and constant bits
/// all agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    words: Vec<u32>,
    length: usize,
    constant: bool,
}

impl BitVector {
    /// Creates the all-zero vector of `length` bits.
    ///
    /// # Examples
    ///
    /// ```
    /// use fasta::BitVector;
    ///
    /// let v = BitVector::new(329);
    /// assert_eq!(v.len(), 329);
    /// assert_eq!(v.words().len(), 11);
    /// assert_eq!(v.hamming_weight(), 0);
    /// ```
    pub fn new(length: usize) -> Self {
        BitVector {
            words: vec![0u32; word_count(length)],
            length,
            constant: false,
        }
    }

    /// Builds a vector of `length` bits from little-endian words.
    ///
    /// Missing words are zero, surplus words are dropped and bits at or
    /// above `length` are cleared.
    pub fn from_words(length: usize, words: &[u32]) -> Self {
        let mut bv = BitVector::new(length);
        for (dst, src) in bv.words.iter_mut().zip(words) {
            *dst = *src;
        }
        bv.mask_tail();
        bv
    }

    /// Draws a vector of `length` bits from a randomness source.
    pub fn random<S: MaskSource + ?Sized>(length: usize, source: &mut S) -> Self {
        source.next_bits(length)
    }

    /// Returns the logical length in bits.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` for a zero-length vector.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the physical words, least significant first.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Returns the auxiliary constant bit.
    pub fn constant(&self) -> bool {
        self.constant
    }

    /// Sets the auxiliary constant bit.
    pub fn set_constant(&mut self, constant: bool) {
        self.constant = constant;
    }

    fn check_index(&self, index: usize) -> Result<(), FastaError> {
        if index >= self.length {
            return Err(FastaError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        Ok(())
    }

    fn check_same_length(&self, other: &BitVector) -> Result<(), FastaError> {
        if self.length != other.length {
            return Err(FastaError::LengthMismatch {
                expected: self.length,
                found: other.length,
            });
        }
        Ok(())
    }

    /// Clears every bit at or above `length` in the last word.
    fn mask_tail(&mut self) {
        let used = self.length % WORD_SIZE;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u32 << used) - 1;
            }
        }
    }

    /// Sets bit `index` to 1.
    ///
    /// # Errors
    /// Returns [`FastaError::IndexOutOfRange`] if `index >= len()`.
    pub fn set_bit(&mut self, index: usize) -> Result<(), FastaError> {
        self.check_index(index)?;
        self.words[index / WORD_SIZE] |= 1 << (index % WORD_SIZE);
        Ok(())
    }

    /// Sets bit `index` to 0.
    ///
    /// # Errors
    /// Returns [`FastaError::IndexOutOfRange`] if `index >= len()`.
    pub fn unset_bit(&mut self, index: usize) -> Result<(), FastaError> {
        self.check_index(index)?;
        self.words[index / WORD_SIZE] &= !(1 << (index % WORD_SIZE));
        Ok(())
    }

    /// Flips bit `index`.
    ///
    /// # Errors
    /// Returns [`FastaError::IndexOutOfRange`] if `index >= len()`.
    pub fn flip_bit(&mut self, index: usize) -> Result<(), FastaError> {
        self.check_index(index)?;
        self.words[index / WORD_SIZE] ^= 1 << (index % WORD_SIZE);
        Ok(())
    }

    /// Returns whether bit `index` is 1.
    ///
    /// # Errors
    /// Returns [`FastaError::IndexOutOfRange`] if `index >= len()`.
    pub fn is_set(&self, index: usize) -> Result<bool, FastaError> {
        self.check_index(index)?;
        Ok(self.words[index / WORD_SIZE] & (1 << (index % WORD_SIZE)) != 0)
    }

    /// Sets every bit and the constant bit to 0.
    pub fn wipe(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
        self.constant = false;
    }

    /// Makes `self` a copy of `other`, constant bit included.
    ///
    /// # Errors
    /// Returns [`FastaError::LengthMismatch`] if the lengths differ.
    pub fn copy_from(&mut self, other: &BitVector) -> Result<(), FastaError> {
        self.check_same_length(other)?;
        self.words.copy_from_slice(&other.words);
        self.constant = other.constant;
        Ok(())
    }

    /// Returns the bitwise AND of `self` and `other`.
    ///
    /// The constant bits are ANDed as well.
    ///
    /// # Errors
    /// Returns [`FastaError::LengthMismatch`] if the lengths differ.
    pub fn and(&self, other: &BitVector) -> Result<BitVector, FastaError> {
        self.check_same_length(other)?;
        Ok(BitVector {
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(a, b)| a & b)
                .collect(),
            length: self.length,
            constant: self.constant & other.constant,
        })
    }

    /// XORs `other` into `self`, constant bit included.
    ///
    /// # Errors
    /// Returns [`FastaError::LengthMismatch`] if the lengths differ; `self`
    /// is left untouched.
    pub fn xor_accumulate(&mut self, other: &BitVector) -> Result<(), FastaError> {
        self.check_same_length(other)?;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a ^= b;
        }
        self.constant ^= other.constant;
        Ok(())
    }

    /// ORs `other` into `self`, constant bit included.
    ///
    /// # Errors
    /// Returns [`FastaError::LengthMismatch`] if the lengths differ; `self`
    /// is left untouched.
    pub fn or_accumulate(&mut self, other: &BitVector) -> Result<(), FastaError> {
        self.check_same_length(other)?;
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= b;
        }
        self.constant |= other.constant;
        Ok(())
    }

    /// Rotates the vector cyclically `amount` positions towards the high end.
    ///
    /// Amounts of `len()` or more wrap around. The constant bit is not
    /// affected.
    ///
    /// # Examples
    ///
    /// ```
    /// use fasta::BitVector;
    ///
    /// let mut v = BitVector::new(329);
    /// v.set_bit(328).unwrap();
    /// v.rotate_left(1);
    /// assert!(v.is_set(0).unwrap());
    /// ```
    pub fn rotate_left(&mut self, amount: usize) {
        if self.length == 0 {
            return;
        }
        let shift = amount % self.length;
        if shift == 0 {
            return;
        }
        let high = self.shifted_left(shift);
        let low = self.shifted_right(self.length - shift);
        for ((w, h), l) in self.words.iter_mut().zip(high).zip(low) {
            *w = h | l;
        }
        self.mask_tail();
    }

    /// Returns a rotated copy, leaving `self` untouched.
    pub fn rotated_left(&self, amount: usize) -> BitVector {
        let mut out = self.clone();
        out.rotate_left(amount);
        out
    }

    /// Shifts the word array up by `shift` bits; bits above the top word are lost.
    fn shifted_left(&self, shift: usize) -> Vec<u32> {
        let n = self.words.len();
        let word_shift = shift / WORD_SIZE;
        let bit_shift = shift % WORD_SIZE;
        let mut out = vec![0u32; n];
        for i in word_shift..n {
            let src = i - word_shift;
            let mut value = self.words[src] << bit_shift;
            if bit_shift != 0 && src > 0 {
                value |= self.words[src - 1] >> (WORD_SIZE - bit_shift);
            }
            out[i] = value;
        }
        out
    }

    /// Shifts the word array down by `shift` bits.
    fn shifted_right(&self, shift: usize) -> Vec<u32> {
        let n = self.words.len();
        let word_shift = shift / WORD_SIZE;
        let bit_shift = shift % WORD_SIZE;
        let mut out = vec![0u32; n];
        for i in 0..n.saturating_sub(word_shift) {
            let src = i + word_shift;
            let mut value = self.words[src] >> bit_shift;
            if bit_shift != 0 && src + 1 < n {
                value |= self.words[src + 1] << (WORD_SIZE - bit_shift);
            }
            out[i] = value;
        }
        out
    }

    /// Clears `target` and copies `self` into its low-order bits.
    ///
    /// # Errors
    /// Returns [`FastaError::EmbedOverflow`] if `self` is longer than
    /// `target`; `target` is left untouched.
    pub fn embed_into(&self, target: &mut BitVector) -> Result<(), FastaError> {
        if self.length > target.length {
            return Err(FastaError::EmbedOverflow {
                source_len: self.length,
                target_len: target.length,
            });
        }
        target.wipe();
        target.words[..self.words.len()].copy_from_slice(&self.words);
        Ok(())
    }

    /// Returns the number of set bits.
    pub fn hamming_weight(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the number of positions at which `self` and `other` differ.
    ///
    /// # Errors
    /// Returns [`FastaError::LengthMismatch`] if the lengths differ.
    pub fn hamming_distance(&self, other: &BitVector) -> Result<usize, FastaError> {
        self.check_same_length(other)?;
        Ok(self
            .words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a ^ b).count_ones() as usize)
            .sum())
    }

    /// Returns the index of the highest set bit, or `None` for the zero vector.
    pub fn highest_set_bit(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * WORD_SIZE + (WORD_SIZE - 1 - w.leading_zeros() as usize))
    }

    /// Returns the index of the lowest set bit, or `None` for the zero vector.
    pub fn lowest_set_bit(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * WORD_SIZE + w.trailing_zeros() as usize)
    }

    /// Interprets the vector as an unsigned integer, bit 0 least significant.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_slice(&self.words)
    }

    /// Renders the bits most significant first, `1` for set and `.` for clear.
    pub fn to_bit_string(&self) -> String {
        let mut out = String::with_capacity(self.length + 2);
        out.push('[');
        for i in (0..self.length).rev() {
            let set = self.words[i / WORD_SIZE] & (1 << (i % WORD_SIZE)) != 0;
            out.push(if set { '1' } else { '.' });
        }
        out.push(']');
        out
    }
}

/// Physical words as `%08x` hex, most significant word first.
impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.words.iter().rev().map(|w| format!("{:08x}", w)).join(" ")
        )
    }
}
