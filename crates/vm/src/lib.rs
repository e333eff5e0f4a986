//! synvm virtual machine — executes 22-opcode word images.
//!
//! The VM is a register and stack machine with:
//! - A flat memory of 16-bit words holding both code and data
//! - Eight registers, addressed by operand words `32768..=32775`
//! - One unbounded stack shared by PUSH/POP and CALL/RET
//!
//! # Usage
//!
//! ```
//! use synvm_common::Program;
//! use synvm_vm::{run, Exit, NoInput};
//!
//! // out 'h'; out 'i'; halt
//! let program = Program::new(vec![19, 104, 19, 105, 0]);
//!
//! let mut output = Vec::new();
//! let exit = run(program, NoInput, &mut output).unwrap();
//! assert_eq!(exit, Exit::Halted);
//! assert_eq!(output, b"hi");
//! ```

pub mod error;
pub mod execute;
pub mod io;
pub mod machine;

pub use error::RuntimeError;
pub use io::{CharInput, LineInput, NoInput};
pub use machine::{Exit, VM};

use std::io::Write;

use synvm_common::Program;

/// Execute a program to completion.
///
/// This is the primary entry point for the VM. Memory is initialised from
/// the image, and execution runs until HALT, RET on an empty stack, or the
/// instruction pointer leaving memory.
///
/// # Errors
///
/// Returns [`RuntimeError`] if execution fails (unknown opcode, stack
/// underflow on POP, out-of-bounds access, etc.).
pub fn run<I: CharInput, O: Write>(
    program: Program,
    input: I,
    output: O,
) -> Result<Exit, RuntimeError> {
    let mut vm = VM::new(program, input, output);
    vm.execute()
}
