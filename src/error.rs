//! Error types for the Fasta library.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the Fasta library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FastaError {
    /// Two bit vectors combined by a binary operation have different lengths.
    #[error("Bit vector lengths differ (expected {expected}, found {found})")]
    LengthMismatch { expected: usize, found: usize },
    /// A vector cannot be embedded into a shorter one.
    #[error("Can't embed vector of length {source_len} into vector of length {target_len}")]
    EmbedOverflow {
        source_len: usize,
        target_len: usize,
    },
    /// Bit index is outside `[0, length)`.
    #[error("Bit index {index} is outside a vector of length {length}")]
    IndexOutOfRange { index: usize, length: usize },
    /// Key does not have the cipher's word width.
    #[error("Key must be {expected} bits long, found {found}")]
    InvalidKeyLength { expected: usize, found: usize },
    /// A block or key file could not be opened, read or written.
    #[error("Could not access the file {}: {kind}", .path.display())]
    Io { path: PathBuf, kind: io::ErrorKind },
    /// A block file does not follow the textual hexadecimal format.
    #[error("Malformed block file at line {line}: {reason}")]
    MalformedBlockFile { line: usize, reason: String },
}
