//! Program images are headerless streams of little endian words:
//!
//! ```text
//! 09 00 00 80 01 80 04 00 13 00 00 80 00 00
//! ```
//!
//! decodes to `add r0 r1 4; out r0; halt`.

use std::error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{Byte, Memory, Word};

#[derive(Debug)]
pub enum ImageError {
    /// The image holds more words than the memory can address
    TooLarge { words: usize, capacity: usize },
    /// The image could not be read
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::TooLarge { words, capacity } => write!(
                f,
                "image has {} words but memory only holds {}",
                words, capacity
            ),
            ImageError::Io { path, .. } => write!(f, "failed to read `{}`", path.display()),
        }
    }
}

impl error::Error for ImageError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ImageError::Io { source, .. } => Some(source),
            ImageError::TooLarge { .. } => None,
        }
    }
}

pub type Result<T, E = ImageError> = std::result::Result<T, E>;

/// Decodes little endian byte pairs (low byte first). A trailing odd byte is dropped.
pub fn decode(bytes: &[Byte]) -> Vec<Word> {
    let chunks = bytes.chunks_exact(2);

    if !chunks.remainder().is_empty() {
        log::warn!(
            "image has odd length {}, dropping the trailing byte",
            bytes.len()
        );
    }

    chunks
        .map(|pair| Word::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Encodes words into a little endian image
pub fn encode(words: &[Word]) -> Vec<Byte> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

impl<const S: usize> Memory<S> {
    /// Creates a memory holding `words` from address 0, the rest zeroed.
    pub fn from_words(words: &[Word]) -> Result<Self> {
        if words.len() > S {
            return Err(ImageError::TooLarge {
                words: words.len(),
                capacity: S,
            });
        }

        let mut memory = Self::default();
        memory.write_array(0, words);

        log::debug!("Loaded {} words into memory", words.len());

        Ok(memory)
    }

    /// Creates a memory from a little endian image
    pub fn from_bytes(bytes: &[Byte]) -> Result<Self> {
        Self::from_words(&decode(bytes))
    }

    /// Reads the image at `path` into a new memory
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_bytes(&bytes)
    }
}
