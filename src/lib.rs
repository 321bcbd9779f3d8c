//! Fasta stream cipher engine.
//!
//! Fasta is a symmetric stream cipher built on a substitution-permutation
//! network over 1645-bit blocks (five 329-bit words). Every keystream block
//! runs the key through an initial random affine layer and six rounds of
//! a Keccak-style Chi layer, a randomly selected Theta-based linear layer
//! and a random affine mask, then feeds the key forward.
//!
//! The random choices are not secret. They come from an injected
//! [`MaskSource`], and decryption replays them by starting a source in the
//! same state as the encrypting one.
//!
//! # Architecture
//!
//! ```text
//! BitVector           (fixed-length bit vector, 32-bit words)
//!     ↓
//! RotationSchedule    (24 rotation amounts from one random integer)
//! Chi / Theta         (nonlinear and linear layers on a 5-word State)
//!     ↓
//! KeystreamGenerator  (initial affine layer + 6 rounds + feed-forward)
//!     ↓
//! Fasta               (XOR of keystream blocks into message blocks)
//! ```
//!
//! # Examples
//!
//! ```
//! use fasta::{BitVector, ChaChaSource, Fasta, BLOCK_BITS, WORD_BITS};
//!
//! let mut key_source = ChaChaSource::seed_from_u64(2024);
//! let key = BitVector::random(WORD_BITS, &mut key_source);
//! let cipher = Fasta::new(key).unwrap();
//!
//! let mut block = BitVector::new(BLOCK_BITS);
//! block.set_bit(7).unwrap();
//! let plaintext = vec![block];
//!
//! let ciphertext = cipher
//!     .encrypt(&plaintext, &mut ChaChaSource::seed_from_u64(1))
//!     .unwrap();
//! let decrypted = cipher
//!     .decrypt(&ciphertext, &mut ChaChaSource::seed_from_u64(1))
//!     .unwrap();
//! assert_eq!(decrypted, plaintext);
//! ```

#![deny(clippy::all)]

pub mod chi;
pub mod error;
pub mod keystream;
pub mod linear;
pub mod random;
pub mod rotation;
pub mod state;
pub mod utils;

mod fasta;

pub use error::FastaError;
pub use fasta::Fasta;
pub use keystream::{KeystreamGenerator, ROUNDS};
pub use random::chacha_source::ChaChaSource;
pub use random::glibc_random::GlibcRandom;
pub use random::mask_source::MaskSource;
pub use rotation::{transformation_count, RotationSchedule, RANDOM_INTEGER_BITS, THETA_ITERATIONS};
pub use state::{State, BLOCK_BITS, STATE_WORDS, WORD_BITS};
pub use utils::bit_vector::BitVector;
