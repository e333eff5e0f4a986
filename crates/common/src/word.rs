//! The 15-bit value domain and operand classification.
//!
//! Every cell in a program image is a 16-bit word. As a source operand a word
//! is either a literal (`0..=32767`) or a register reference
//! (`32768..=32775`). Anything above that is outside the encoding.

/// Values are reduced modulo this after `add` and `mult`.
pub const MODULUS: u32 = 32768;

/// Mask selecting the 15 value bits of a word.
pub const VALUE_MASK: u16 = 0x7fff;

/// First raw word that names a register.
pub const REGISTER_BASE: u16 = 32768;

/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 8;

/// Largest number of words an image may hold. The instruction pointer is 16 bits.
pub const MAX_WORDS: usize = 1 << 16;

/// A raw operand word, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Denotes itself.
    Literal(u16),
    /// Denotes register `0..=7`.
    Register(usize),
    /// Outside the encoding (`32776..=65535`).
    Invalid(u16),
}

impl Operand {
    /// Classify a raw operand word.
    pub fn decode(raw: u16) -> Self {
        if raw < REGISTER_BASE {
            Operand::Literal(raw)
        } else {
            let index = (raw - REGISTER_BASE) as usize;
            if index < REGISTER_COUNT {
                Operand::Register(index)
            } else {
                Operand::Invalid(raw)
            }
        }
    }

    /// The raw word for register `index`. Panics if `index >= 8`.
    pub fn register(index: usize) -> u16 {
        assert!(index < REGISTER_COUNT, "register index {index} out of range");
        REGISTER_BASE + index as u16
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Literal(v) => write!(f, "{v}"),
            Operand::Register(r) => write!(f, "r{r}"),
            Operand::Invalid(raw) => write!(f, "<invalid {raw}>"),
        }
    }
}
