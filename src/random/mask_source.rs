//! MaskSource trait for the cipher's randomness.
//!
//! Every random bit the keystream generator consumes (the 63-bit integers
//! that select a linear layer and the 329-bit affine masks) is requested
//! through this trait. Implementations must be deterministic for a given
//! seed, since decryption replays the encryption's draws block for block.

use crate::utils::bit_vector::BitVector;

/// Source of pseudo-random bit vectors.
pub trait MaskSource {
    /// Returns the next `length` random bits.
    ///
    /// Bits at or above `length` in the returned vector are zero and its
    /// constant bit is clear.
    fn next_bits(&mut self, length: usize) -> BitVector;

    /// Short name used in log output.
    fn name(&self) -> &'static str {
        "custom"
    }
}
