//! Decode errors for synvm program images and opcode words.

use thiserror::Error;

/// Errors that occur while decoding an image or an opcode word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Word value has no opcode assigned (valid opcodes are 0..=21).
    #[error("unknown opcode: {0}")]
    UnknownOpcode(u16),

    /// Image byte length is not a multiple of 2.
    #[error("invalid image length: {0} bytes (must be a multiple of 2)")]
    OddLength(usize),

    /// Image holds more words than a 16-bit instruction pointer can address.
    #[error("image too large: {0} words (at most 65536)")]
    ImageTooLarge(usize),
}
