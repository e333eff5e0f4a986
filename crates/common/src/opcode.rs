//! Opcode definitions for the synvm instruction set.
//!
//! An instruction is one opcode word followed by a fixed, opcode-specific
//! number of operand words. There is no other framing.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u16)]` discriminant is the opcode word as it appears in a
/// program image.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Stop execution.
    Halt = 0,
    /// `set a b`: store b into a.
    Set = 1,
    /// `push a`: push a onto the stack.
    Push = 2,
    /// `pop a`: pop the stack into a. Empty stack is a runtime error.
    Pop = 3,
    /// `eq a b c`: a = 1 if b == c, else 0.
    Eq = 4,
    /// `gt a b c`: a = 1 if b > c, else 0.
    Gt = 5,
    /// `jmp a`: jump to a.
    Jmp = 6,
    /// `jt a b`: jump to b if a is nonzero.
    Jt = 7,
    /// `jf a b`: jump to b if a is zero.
    Jf = 8,
    /// `add a b c`: a = (b + c) mod 32768.
    Add = 9,
    /// `mult a b c`: a = (b * c) mod 32768.
    Mult = 10,
    /// `mod a b c`: a = b mod c.
    Mod = 11,
    /// `and a b c`: a = b & c.
    And = 12,
    /// `or a b c`: a = b | c.
    Or = 13,
    /// `not a b`: a = 15-bit bitwise inverse of b.
    Not = 14,
    /// `rmem a b`: a = memory[b].
    Rmem = 15,
    /// `wmem a b`: memory[a] = b.
    Wmem = 16,
    /// `call a`: push the return address, jump to a.
    Call = 17,
    /// `ret`: pop the return address and jump to it. Empty stack halts.
    Ret = 18,
    /// `out a`: write a as a character.
    Out = 19,
    /// `in a`: read one input byte into a.
    In = 20,
    /// No operation.
    Noop = 21,
}

/// All valid opcodes, in encoding order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 22] = [
    Opcode::Halt,
    Opcode::Set,
    Opcode::Push,
    Opcode::Pop,
    Opcode::Eq,
    Opcode::Gt,
    Opcode::Jmp,
    Opcode::Jt,
    Opcode::Jf,
    Opcode::Add,
    Opcode::Mult,
    Opcode::Mod,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Rmem,
    Opcode::Wmem,
    Opcode::Call,
    Opcode::Ret,
    Opcode::Out,
    Opcode::In,
    Opcode::Noop,
];

impl TryFrom<u16> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ALL_OPCODES
            .get(value as usize)
            .copied()
            .ok_or(DecodeError::UnknownOpcode(value))
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Halt => "halt",
            Opcode::Set => "set",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Eq => "eq",
            Opcode::Gt => "gt",
            Opcode::Jmp => "jmp",
            Opcode::Jt => "jt",
            Opcode::Jf => "jf",
            Opcode::Add => "add",
            Opcode::Mult => "mult",
            Opcode::Mod => "mod",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Not => "not",
            Opcode::Rmem => "rmem",
            Opcode::Wmem => "wmem",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Out => "out",
            Opcode::In => "in",
            Opcode::Noop => "noop",
        }
    }

    /// Number of operand words that follow this opcode in the image.
    pub fn operand_count(&self) -> usize {
        match self {
            Opcode::Halt | Opcode::Ret | Opcode::Noop => 0,
            Opcode::Push
            | Opcode::Pop
            | Opcode::Jmp
            | Opcode::Call
            | Opcode::Out
            | Opcode::In => 1,
            Opcode::Set | Opcode::Jt | Opcode::Jf | Opcode::Not | Opcode::Rmem | Opcode::Wmem => 2,
            Opcode::Eq
            | Opcode::Gt
            | Opcode::Add
            | Opcode::Mult
            | Opcode::Mod
            | Opcode::And
            | Opcode::Or => 3,
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
