//! VM state: memory, registers, stack, instruction pointer, and operand
//! resolution.

use crate::error::RuntimeError;
use synvm_common::{Operand, Program, REGISTER_COUNT};

/// How a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// HALT executed.
    Halted,
    /// RET executed with an empty stack: there was no caller to return to.
    Returned,
    /// The instruction pointer moved past the last word of memory.
    EndOfMemory,
}

impl std::fmt::Display for Exit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Exit::Halted => "halted",
            Exit::Returned => "returned with empty stack",
            Exit::EndOfMemory => "ran past end of memory",
        })
    }
}

/// The synvm virtual machine.
///
/// `I` supplies bytes for IN, `O` receives characters from OUT.
pub struct VM<I, O> {
    /// Address space, sized to the loaded image.
    pub(crate) memory: Vec<u16>,
    pub(crate) registers: [u16; REGISTER_COUNT],
    /// Shared data and return-address stack.
    pub(crate) stack: Vec<u16>,
    /// Address of the next word to fetch. Jump targets are 16 bits; the
    /// extra range only holds 65536, one past the last word of a full image.
    pub(crate) ip: u32,
    pub(crate) halted: bool,
    /// Address of the opcode currently executing, for error reports.
    pub(crate) at: u16,
    /// Set once the run has ended, successfully or not.
    pub(crate) exit: Option<Exit>,
    pub(crate) fault: Option<RuntimeError>,
    pub(crate) input: I,
    pub(crate) output: O,
}

impl<I, O> VM<I, O> {
    /// Create a VM whose memory is the program image.
    ///
    /// Registers start at zero, the stack empty, the instruction pointer at 0.
    pub fn new(program: Program, input: I, output: O) -> Self {
        Self {
            memory: program.words,
            registers: [0; REGISTER_COUNT],
            stack: Vec::new(),
            ip: 0,
            halted: false,
            at: 0,
            exit: None,
            fault: None,
            input,
            output,
        }
    }

    /// Read a source operand: literals denote themselves, register
    /// references denote the register's current value.
    pub fn resolve_value(&self, raw: u16) -> Result<u16, RuntimeError> {
        match Operand::decode(raw) {
            Operand::Literal(value) => Ok(value),
            Operand::Register(index) => Ok(self.registers[index]),
            Operand::Invalid(raw) => Err(RuntimeError::InvalidOperand { at: self.at, raw }),
        }
    }

    /// Write through a destination operand.
    ///
    /// A register reference names the register. Any lower word is a memory
    /// address, never a literal.
    pub fn store(&mut self, dest: u16, value: u16) -> Result<(), RuntimeError> {
        match Operand::decode(dest) {
            Operand::Literal(address) => self.write(address, value),
            Operand::Register(index) => {
                self.registers[index] = value;
                Ok(())
            }
            Operand::Invalid(raw) => Err(RuntimeError::InvalidOperand { at: self.at, raw }),
        }
    }

    /// Read the word at the instruction pointer and advance past it.
    pub(crate) fn fetch(&mut self) -> Result<u16, RuntimeError> {
        let word = self.read(self.ip)?;
        self.ip += 1;
        Ok(word)
    }

    pub(crate) fn read(&self, address: u32) -> Result<u16, RuntimeError> {
        self.memory
            .get(address as usize)
            .copied()
            .ok_or(RuntimeError::AddressOutOfBounds { at: self.at, address })
    }

    pub(crate) fn write(&mut self, address: u16, value: u16) -> Result<(), RuntimeError> {
        let at = self.at;
        let cell = self
            .memory
            .get_mut(address as usize)
            .ok_or(RuntimeError::AddressOutOfBounds {
                at,
                address: u32::from(address),
            })?;
        *cell = value;
        Ok(())
    }

    pub(crate) fn push(&mut self, value: u16) {
        self.stack.push(value);
    }

    pub(crate) fn pop(&mut self) -> Result<u16, RuntimeError> {
        self.stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow { at: self.at })
    }

    pub fn memory(&self) -> &[u16] {
        &self.memory
    }

    pub fn registers(&self) -> &[u16; REGISTER_COUNT] {
        &self.registers
    }

    /// Stack contents, bottom first.
    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    pub fn ip(&self) -> u32 {
        self.ip
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// How the run ended, once it has ended without error.
    pub fn exit(&self) -> Option<Exit> {
        self.exit
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Consume the VM, returning its output sink.
    pub fn into_output(self) -> O {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::NoInput;

    fn vm(words: Vec<u16>) -> VM<NoInput, Vec<u8>> {
        VM::new(Program::new(words), NoInput, Vec::new())
    }

    #[test]
    fn initial_state() {
        let vm = vm(vec![21, 21, 0]);
        assert_eq!(vm.memory(), &[21, 21, 0]);
        assert_eq!(vm.registers(), &[0; 8]);
        assert!(vm.stack().is_empty());
        assert_eq!(vm.ip(), 0);
        assert!(!vm.is_halted());
        assert_eq!(vm.exit(), None);
    }

    #[test]
    fn resolve_literal() {
        let vm = vm(vec![]);
        assert_eq!(vm.resolve_value(0), Ok(0));
        assert_eq!(vm.resolve_value(32767), Ok(32767));
    }

    #[test]
    fn store_register_then_resolve() {
        let mut vm = vm(vec![]);
        vm.store(32770, 1234).unwrap();
        assert_eq!(vm.registers()[2], 1234);
        assert_eq!(vm.resolve_value(32770), Ok(1234));
    }

    #[test]
    fn store_low_word_is_memory_address() {
        let mut vm = vm(vec![0, 0, 0]);
        vm.store(2, 99).unwrap();
        assert_eq!(vm.memory(), &[0, 0, 99]);
        assert_eq!(vm.registers(), &[0; 8]);
    }

    #[test]
    fn store_out_of_bounds() {
        let mut vm = vm(vec![0]);
        assert_eq!(
            vm.store(5, 1),
            Err(RuntimeError::AddressOutOfBounds { at: 0, address: 5 })
        );
    }

    #[test]
    fn invalid_operand_both_ways() {
        let mut vm = vm(vec![0]);
        assert_eq!(
            vm.resolve_value(32776),
            Err(RuntimeError::InvalidOperand { at: 0, raw: 32776 })
        );
        assert_eq!(
            vm.store(40000, 1),
            Err(RuntimeError::InvalidOperand { at: 0, raw: 40000 })
        );
    }

    #[test]
    fn fetch_advances() {
        let mut vm = vm(vec![7, 8]);
        assert_eq!(vm.fetch(), Ok(7));
        assert_eq!(vm.fetch(), Ok(8));
        assert_eq!(vm.ip(), 2);
        assert_eq!(
            vm.fetch(),
            Err(RuntimeError::AddressOutOfBounds { at: 0, address: 2 })
        );
    }

    #[test]
    fn pop_empty() {
        let mut vm = vm(vec![]);
        assert_eq!(vm.pop(), Err(RuntimeError::StackUnderflow { at: 0 }));
        vm.push(5);
        assert_eq!(vm.pop(), Ok(5));
    }
}
