//! Bit-vector arithmetic and block file helpers.

pub mod bit_vector;
pub mod block_file;
