//! Textual hexadecimal block files.
//!
//! A file holds a decimal vector count on its first line, followed by one
//! line per vector listing its 32-bit words as `%08x`, most significant
//! word first, each followed by a space. Plaintext, ciphertext and key
//! files all use this layout; only the vector width differs.

use std::fs;
use std::path::Path;

use crate::error::FastaError;
use crate::state::{BLOCK_BITS, WORD_BITS};
use crate::utils::bit_vector::{word_count, BitVector};

/// Renders `vectors` in block file layout.
///
/// # Examples
///
/// ```
/// use fasta::utils::block_file::format_vectors;
/// use fasta::BitVector;
///
/// let v = BitVector::from_words(40, &[0xDEADBEEF, 0x12]);
/// assert_eq!(format_vectors(&[v]), "1\n00000012 deadbeef \n");
/// ```
pub fn format_vectors(vectors: &[BitVector]) -> String {
    let mut out = format!("{}\n", vectors.len());
    for vector in vectors {
        for word in vector.words().iter().rev() {
            out.push_str(&format!("{:08x} ", word));
        }
        out.push('\n');
    }
    out
}

fn malformed(line: usize, reason: impl Into<String>) -> FastaError {
    FastaError::MalformedBlockFile {
        line,
        reason: reason.into(),
    }
}

/// Parses block file text holding vectors of `bit_length` bits.
///
/// Line breaks are not significant beyond error reporting: words may be
/// split across lines as long as their order is kept.
///
/// # Errors
/// Returns [`FastaError::MalformedBlockFile`] for a missing or invalid
/// count, a token that is not 1 to 8 hex digits, too few or too many
/// words, or a set bit at or above `bit_length`.
pub fn parse_vectors(text: &str, bit_length: usize) -> Result<Vec<BitVector>, FastaError> {
    let mut tokens = text
        .lines()
        .enumerate()
        .flat_map(|(n, line)| line.split_whitespace().map(move |t| (n + 1, t)));

    let (count_line, count_token) = tokens
        .next()
        .ok_or_else(|| malformed(1, "missing vector count"))?;
    let count: usize = count_token
        .parse()
        .map_err(|_| malformed(count_line, format!("invalid vector count {:?}", count_token)))?;

    let words_per_vector = word_count(bit_length);
    let mut vectors = Vec::new();
    let mut last_line = count_line;
    for index in 0..count {
        let mut words = vec![0u32; words_per_vector];
        for slot in words.iter_mut().rev() {
            let (line, token) = tokens.next().ok_or_else(|| {
                malformed(
                    last_line,
                    format!("expected {} vectors, file ends inside vector {}", count, index),
                )
            })?;
            last_line = line;
            if !token.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(malformed(line, format!("invalid hex word {:?}", token)));
            }
            if token.len() > 8 {
                return Err(malformed(line, format!("word {:?} exceeds 32 bits", token)));
            }
            *slot = u32::from_str_radix(token, 16)
                .map_err(|_| malformed(line, format!("invalid hex word {:?}", token)))?;
        }
        let vector = BitVector::from_words(bit_length, &words);
        if vector.words() != words.as_slice() {
            return Err(malformed(
                last_line,
                format!("vector {} has bits set beyond bit {}", index, bit_length),
            ));
        }
        vectors.push(vector);
    }

    if let Some((line, token)) = tokens.next() {
        return Err(malformed(
            line,
            format!("unexpected data {:?} after the last vector", token),
        ));
    }
    Ok(vectors)
}

/// Reads a block file holding vectors of `bit_length` bits.
///
/// # Errors
/// Returns [`FastaError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_vectors`].
pub fn read_vectors(path: impl AsRef<Path>, bit_length: usize) -> Result<Vec<BitVector>, FastaError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| FastaError::Io {
        path: path.to_path_buf(),
        kind: e.kind(),
    })?;
    parse_vectors(&text, bit_length)
}

/// Writes `vectors` as a block file, replacing any existing file.
///
/// # Errors
/// Returns [`FastaError::Io`] if the file cannot be written.
pub fn write_vectors(path: impl AsRef<Path>, vectors: &[BitVector]) -> Result<(), FastaError> {
    let path = path.as_ref();
    fs::write(path, format_vectors(vectors)).map_err(|e| FastaError::Io {
        path: path.to_path_buf(),
        kind: e.kind(),
    })
}

/// Reads a plaintext or ciphertext file of 1645-bit blocks.
pub fn read_blocks(path: impl AsRef<Path>) -> Result<Vec<BitVector>, FastaError> {
    read_vectors(path, BLOCK_BITS)
}

/// Writes a plaintext or ciphertext file.
pub fn write_blocks(path: impl AsRef<Path>, blocks: &[BitVector]) -> Result<(), FastaError> {
    write_vectors(path, blocks)
}

/// Reads a key file: exactly one 329-bit vector.
pub fn read_key(path: impl AsRef<Path>) -> Result<BitVector, FastaError> {
    let mut vectors = read_vectors(path, WORD_BITS)?;
    if vectors.len() != 1 {
        return Err(malformed(
            1,
            format!("expected one key, found {}", vectors.len()),
        ));
    }
    Ok(vectors.remove(0))
}

/// Writes a key file.
pub fn write_key(path: impl AsRef<Path>, key: &BitVector) -> Result<(), FastaError> {
    write_vectors(path, std::slice::from_ref(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fasta-{}-{}", std::process::id(), name))
    }

    fn sample_block(seed: u32) -> BitVector {
        let words: Vec<u32> = (0..52u32)
            .map(|i| i.wrapping_mul(0x9E37_79B9) ^ seed)
            .collect();
        BitVector::from_words(BLOCK_BITS, &words)
    }

    #[test]
    fn test_format_layout() {
        let text = format_vectors(&[sample_block(1), sample_block(2)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1].split(' ').filter(|t| !t.is_empty()).count(), 52);
        assert!(lines[1].ends_with(' '));
        assert!(text.ends_with(" \n"));
    }

    #[test]
    fn test_parse_reads_back_formatted() {
        let blocks = vec![sample_block(7), BitVector::new(BLOCK_BITS)];
        let parsed = parse_vectors(&format_vectors(&blocks), BLOCK_BITS).unwrap();
        assert_eq!(parsed, blocks);
    }

    #[test]
    fn test_parse_tolerates_line_breaks() {
        let text = "1\n00000012\n   deadbeef\n\n";
        let parsed = parse_vectors(text, 40).unwrap();
        assert_eq!(parsed, vec![BitVector::from_words(40, &[0xDEAD_BEEF, 0x12])]);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_vectors("", 40),
            Err(FastaError::MalformedBlockFile {
                line: 1,
                reason: "missing vector count".to_string()
            })
        );
        assert!(matches!(
            parse_vectors("x\n", 40),
            Err(FastaError::MalformedBlockFile { line: 1, .. })
        ));
        assert!(matches!(
            parse_vectors("2\n00000000 00000000\n", 40),
            Err(FastaError::MalformedBlockFile { line: 2, .. })
        ));
        assert!(matches!(
            parse_vectors("1\n00000000 0000000g\n", 40),
            Err(FastaError::MalformedBlockFile { line: 2, .. })
        ));
        assert!(matches!(
            parse_vectors("1\n00000000 000000000\n", 40),
            Err(FastaError::MalformedBlockFile { line: 2, .. })
        ));
        assert!(matches!(
            parse_vectors("1\n00000100 00000000\n", 40),
            Err(FastaError::MalformedBlockFile { line: 2, .. })
        ));
        assert!(matches!(
            parse_vectors("1\n00000000 00000000\nff\n", 40),
            Err(FastaError::MalformedBlockFile { line: 3, .. })
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let path = temp_path("blocks.txt");
        let blocks = vec![sample_block(3), sample_block(4), sample_block(5)];
        write_blocks(&path, &blocks).unwrap();
        assert_eq!(read_blocks(&path).unwrap(), blocks);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_key_file() {
        let path = temp_path("key.txt");
        let mut key = BitVector::new(WORD_BITS);
        key.set_bit(328).unwrap();
        write_key(&path, &key).unwrap();
        assert_eq!(read_key(&path).unwrap(), key);
        fs::write(&path, "0\n").unwrap();
        assert!(matches!(
            read_key(&path),
            Err(FastaError::MalformedBlockFile { line: 1, .. })
        ));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let path = temp_path("does-not-exist.txt");
        assert_eq!(
            read_blocks(&path),
            Err(FastaError::Io {
                path: path.clone(),
                kind: io::ErrorKind::NotFound
            })
        );
    }
}
