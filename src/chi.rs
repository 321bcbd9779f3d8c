//! Chi: the nonlinear layer.
//!
//! Keccak's chi applied to each 329-bit word on its own:
//! `w <- (rot1(w) & rot2(w)) ^ w ^ rot2(w)`. There is no mixing between
//! words.

use crate::error::FastaError;
use crate::state::State;

/// Returns Chi of `state`.
pub fn chi(state: &State) -> Result<State, FastaError> {
    let mut out = state.clone();
    for word in out.words_mut().iter_mut() {
        let w1 = word.rotated_left(1);
        let w2 = word.rotated_left(2);
        let mut next = w1.and(&w2)?;
        next.xor_accumulate(word)?;
        next.xor_accumulate(&w2)?;
        *word = next;
    }
    Ok(out)
}
