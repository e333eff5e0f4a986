//! synvm common types and image encoding.
//!
//! This crate provides the foundational data structures for the synvm
//! instruction set:
//!
//! - [`Opcode`] — the 22 opcodes and their operand counts
//! - [`Operand`] — literal / register classification of raw words
//! - [`Program`] — a decoded image, with little-endian encode/decode
//! - [`DecodeError`] — errors from decoding images and opcode words
//!
//! # Dependencies
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod error;
pub mod opcode;
pub mod program;
pub mod word;

// Re-export commonly used types at the crate root.
pub use error::DecodeError;
pub use opcode::Opcode;
pub use program::{LoadError, Program};
pub use word::{Operand, MAX_WORDS, MODULUS, REGISTER_BASE, REGISTER_COUNT, VALUE_MASK};
