//! Runtime errors for the synvm VM.
//!
//! Every error aborts the run. Each variant carries the address of the
//! instruction that was executing (`at`).

use thiserror::Error;

/// Errors that occur during program execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Opcode word has no routine. Raised before the instruction pointer moves.
    #[error("unknown opcode {opcode} at address {at}")]
    UnknownOpcode { at: u16, opcode: u16 },

    /// POP with an empty stack.
    #[error("stack underflow at address {at}")]
    StackUnderflow { at: u16 },

    /// Operand word above the last register reference (32775).
    #[error("invalid operand {raw} at address {at}")]
    InvalidOperand { at: u16, raw: u16 },

    /// Memory read or write outside the loaded image, including fetching an
    /// operand past the end of memory. `address` can be 65536 when a full
    /// size image is read past its last word.
    #[error("address {address} out of bounds at address {at}")]
    AddressOutOfBounds { at: u16, address: u32 },

    /// MOD with a zero divisor.
    #[error("division by zero at address {at}")]
    DivisionByZero { at: u16 },

    /// IN with no more input to read.
    #[error("input exhausted at address {at}")]
    InputExhausted { at: u16 },

    /// The input or output collaborator failed.
    #[error("i/o error at address {at}: {message}")]
    Io { at: u16, message: String },
}
