//! Randomness sources for the affine masks and rotation schedules.
//!
//! The cipher draws every random quantity through [`MaskSource`], so a
//! session is reproducible exactly when its source is re-created from the
//! same seed before encrypting and before decrypting.

pub mod chacha_source;
pub mod glibc_random;
pub mod mask_source;
