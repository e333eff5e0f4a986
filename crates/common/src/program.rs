//! Program images.
//!
//! An image file is a raw sequence of little-endian 16-bit words with no
//! header. Word `i` of the file becomes memory cell `i`.

use std::path::Path;

use crate::error::DecodeError;
use crate::word::MAX_WORDS;

/// A decoded program image: the initial memory contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    /// The word stream.
    pub words: Vec<u16>,
}

/// Errors from [`Program::load`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid image.
    #[error("invalid image '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: DecodeError,
    },
}

impl Program {
    /// Create a program from already decoded words.
    pub fn new(words: Vec<u16>) -> Self {
        Self { words }
    }

    /// Encode the program as image bytes.
    ///
    /// The result length is always `words.len() * 2`.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.words.len() * 2);
        for word in &self.words {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    /// Decode image bytes into a program.
    ///
    /// The byte length must be even. A trailing unpaired byte is rejected
    /// rather than padded or dropped.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if !bytes.len().is_multiple_of(2) {
            return Err(DecodeError::OddLength(bytes.len()));
        }
        let count = bytes.len() / 2;
        if count > MAX_WORDS {
            return Err(DecodeError::ImageTooLarge(count));
        }

        let words = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self { words })
    }

    /// Read and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::decode(&bytes).map_err(|source| LoadError::Decode {
            path: path.display().to_string(),
            source,
        })
    }

    /// Number of words in the image.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if the image has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl From<Vec<u16>> for Program {
    fn from(words: Vec<u16>) -> Self {
        Self::new(words)
    }
}
