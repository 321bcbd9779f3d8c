//! Theta and the linear layer built from four Theta iterations.
//!
//! One Theta iteration sums the five words, folds three rotated copies of
//! the sum back into it and XORs the result into every word. Between
//! iterations words 1..=4 are rotated by amounts from the round's
//! [`RotationSchedule`]; word 0 never moves.

use crate::error::FastaError;
use crate::rotation::{RotationSchedule, THETA_ITERATIONS};
use crate::state::{State, WORD_BITS};
use crate::utils::bit_vector::BitVector;

/// Returns one Theta iteration of `state` with sum rotations `r1, r2, r3`.
pub fn theta_iteration(
    state: &State,
    r1: usize,
    r2: usize,
    r3: usize,
) -> Result<State, FastaError> {
    let mut sum = BitVector::new(WORD_BITS);
    for word in state.words() {
        sum.xor_accumulate(word)?;
    }

    let rotated = [r1, r2, r3].map(|r| sum.rotated_left(r));
    for copy in &rotated {
        sum.xor_accumulate(copy)?;
    }

    let mut out = state.clone();
    for word in out.words_mut().iter_mut() {
        word.xor_accumulate(&sum)?;
    }
    Ok(out)
}

/// Returns the linear layer selected by `schedule` applied to `state`.
pub fn linear_transformation(
    state: &State,
    schedule: &RotationSchedule,
) -> Result<State, FastaError> {
    let mut out = state.clone();
    for k in 0..THETA_ITERATIONS {
        let (r1, r2, r3) = schedule.theta_rotations(k);
        out = theta_iteration(&out, r1, r2, r3)?;
        if k + 1 < THETA_ITERATIONS {
            for (i, word) in out.words_mut().iter_mut().enumerate().skip(1) {
                word.rotate_left(schedule.word_rotation(k, i));
            }
        }
    }
    Ok(out)
}
