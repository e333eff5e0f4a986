//! Main execution loop and opcode dispatch for the synvm VM.

use std::io::Write;

use log::{debug, warn};
use synvm_common::{Opcode, MODULUS, VALUE_MASK};

use crate::error::RuntimeError;
use crate::io::CharInput;
use crate::machine::{Exit, VM};

impl<I: CharInput, O: Write> VM<I, O> {
    /// Execute until HALT, RET on an empty stack, the end of memory, or an
    /// error. Output is flushed before returning.
    pub fn execute(&mut self) -> Result<Exit, RuntimeError> {
        debug!("starting run: {} words of memory", self.memory.len());

        let result = loop {
            match self.step() {
                Ok(Some(exit)) => break Ok(exit),
                Ok(None) => {}
                Err(e) => break Err(e),
            }
        };
        let flushed = self.flush_output();

        match &result {
            Ok(exit) => debug!("run finished at address {}: {exit}", self.at),
            Err(e) => warn!("run aborted: {e}"),
        }

        let exit = result?;
        flushed?;
        Ok(exit)
    }

    /// Execute a single instruction.
    ///
    /// Returns `Some(exit)` once the run has ended; further calls keep
    /// returning the same exit. After an error the VM is dead and every
    /// further call returns that error again without executing anything.
    pub fn step(&mut self) -> Result<Option<Exit>, RuntimeError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        if let Some(exit) = self.exit {
            return Ok(Some(exit));
        }

        match self.step_inner() {
            Ok(exit) => {
                self.exit = exit;
                Ok(exit)
            }
            Err(e) => {
                self.fault = Some(e.clone());
                Err(e)
            }
        }
    }

    fn step_inner(&mut self) -> Result<Option<Exit>, RuntimeError> {
        if self.ip as usize >= self.memory.len() {
            return Ok(Some(Exit::EndOfMemory));
        }

        // Decode before advancing: an unknown opcode leaves the state untouched.
        // ip < memory.len() <= 65536, so it fits in 16 bits here.
        self.at = self.ip as u16;
        let word = self.read(self.ip)?;
        let opcode = Opcode::try_from(word).map_err(|_| RuntimeError::UnknownOpcode {
            at: self.at,
            opcode: word,
        })?;
        self.ip += 1;

        match opcode {
            Opcode::Halt => self.halted = true,
            Opcode::Set => self.exec_set()?,
            Opcode::Push => self.exec_push()?,
            Opcode::Pop => self.exec_pop()?,
            Opcode::Eq => self.exec_comparison(|b, c| b == c)?,
            Opcode::Gt => self.exec_comparison(|b, c| b > c)?,
            Opcode::Jmp => self.exec_jmp()?,
            Opcode::Jt => self.exec_jump_if(|cond| cond != 0)?,
            Opcode::Jf => self.exec_jump_if(|cond| cond == 0)?,
            Opcode::Add => {
                self.exec_binary(|b, c| ((u32::from(b) + u32::from(c)) % MODULUS) as u16)?
            }
            Opcode::Mult => {
                self.exec_binary(|b, c| ((u32::from(b) * u32::from(c)) % MODULUS) as u16)?
            }
            Opcode::Mod => self.exec_mod()?,
            Opcode::And => self.exec_binary(|b, c| b & c)?,
            Opcode::Or => self.exec_binary(|b, c| b | c)?,
            Opcode::Not => self.exec_not()?,
            Opcode::Rmem => self.exec_rmem()?,
            Opcode::Wmem => self.exec_wmem()?,
            Opcode::Call => self.exec_call()?,
            Opcode::Ret => self.exec_ret(),
            Opcode::Out => self.exec_out()?,
            Opcode::In => self.exec_in()?,
            Opcode::Noop => {}
        }

        if !self.halted {
            return Ok(None);
        }
        Ok(Some(if opcode == Opcode::Ret {
            Exit::Returned
        } else {
            Exit::Halted
        }))
    }

    // ---- Data movement ----

    fn exec_set(&mut self) -> Result<(), RuntimeError> {
        let (a, b) = (self.fetch()?, self.fetch()?);
        let value = self.resolve_value(b)?;
        self.store(a, value)
    }

    fn exec_push(&mut self) -> Result<(), RuntimeError> {
        let a = self.fetch()?;
        let value = self.resolve_value(a)?;
        self.push(value);
        Ok(())
    }

    /// The stack is checked before the operand is fetched.
    fn exec_pop(&mut self) -> Result<(), RuntimeError> {
        if self.stack.is_empty() {
            return Err(RuntimeError::StackUnderflow { at: self.at });
        }
        let a = self.fetch()?;
        let value = self.pop()?;
        self.store(a, value)
    }

    fn exec_rmem(&mut self) -> Result<(), RuntimeError> {
        let (a, b) = (self.fetch()?, self.fetch()?);
        let address = self.resolve_value(b)?;
        let value = self.read(u32::from(address))?;
        self.store(a, value)
    }

    fn exec_wmem(&mut self) -> Result<(), RuntimeError> {
        let (a, b) = (self.fetch()?, self.fetch()?);
        let address = self.resolve_value(a)?;
        let value = self.resolve_value(b)?;
        self.write(address, value)
    }

    // ---- Arithmetic & comparison ----

    fn exec_comparison(&mut self, op: fn(u16, u16) -> bool) -> Result<(), RuntimeError> {
        let (a, b, c) = (self.fetch()?, self.fetch()?, self.fetch()?);
        let (b, c) = (self.resolve_value(b)?, self.resolve_value(c)?);
        self.store(a, op(b, c) as u16)
    }

    /// `a = op(b, c)` over resolved operands.
    fn exec_binary(&mut self, op: fn(u16, u16) -> u16) -> Result<(), RuntimeError> {
        let (a, b, c) = (self.fetch()?, self.fetch()?, self.fetch()?);
        let (b, c) = (self.resolve_value(b)?, self.resolve_value(c)?);
        self.store(a, op(b, c))
    }

    fn exec_mod(&mut self) -> Result<(), RuntimeError> {
        let (a, b, c) = (self.fetch()?, self.fetch()?, self.fetch()?);
        let (b, c) = (self.resolve_value(b)?, self.resolve_value(c)?);
        if c == 0 {
            return Err(RuntimeError::DivisionByZero { at: self.at });
        }
        self.store(a, b % c)
    }

    fn exec_not(&mut self) -> Result<(), RuntimeError> {
        let (a, b) = (self.fetch()?, self.fetch()?);
        let value = !self.resolve_value(b)? & VALUE_MASK;
        self.store(a, value)
    }

    // ---- Control flow ----

    fn exec_jmp(&mut self) -> Result<(), RuntimeError> {
        let a = self.fetch()?;
        self.ip = u32::from(self.resolve_value(a)?);
        Ok(())
    }

    /// Both operands are always consumed; the target is only resolved when
    /// the branch is taken.
    fn exec_jump_if(&mut self, taken: fn(u16) -> bool) -> Result<(), RuntimeError> {
        let (a, b) = (self.fetch()?, self.fetch()?);
        if taken(self.resolve_value(a)?) {
            self.ip = u32::from(self.resolve_value(b)?);
        }
        Ok(())
    }

    /// A CALL occupying the last two words of a full image has no 16-bit
    /// return address.
    fn exec_call(&mut self) -> Result<(), RuntimeError> {
        let a = self.fetch()?;
        let target = self.resolve_value(a)?;
        let return_address =
            u16::try_from(self.ip).map_err(|_| RuntimeError::AddressOutOfBounds {
                at: self.at,
                address: self.ip,
            })?;
        self.push(return_address);
        self.ip = u32::from(target);
        Ok(())
    }

    /// An empty stack means there is no caller: the run ends normally.
    fn exec_ret(&mut self) {
        match self.stack.pop() {
            Some(address) => self.ip = u32::from(address),
            None => self.halted = true,
        }
    }

    // ---- I/O ----

    fn exec_out(&mut self) -> Result<(), RuntimeError> {
        let a = self.fetch()?;
        let value = self.resolve_value(a)?;
        let ch = char::from_u32(u32::from(value)).unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut buf = [0u8; 4];
        let at = self.at;
        self.output
            .write_all(ch.encode_utf8(&mut buf).as_bytes())
            .map_err(|e| RuntimeError::Io {
                at,
                message: e.to_string(),
            })
    }

    /// Pending output is flushed first so a prompt is visible while IN blocks.
    fn exec_in(&mut self) -> Result<(), RuntimeError> {
        let a = self.fetch()?;
        self.flush_output()?;
        let at = self.at;
        let byte = self
            .input
            .next_byte()
            .map_err(|e| RuntimeError::Io {
                at,
                message: e.to_string(),
            })?
            .ok_or(RuntimeError::InputExhausted { at })?;
        self.store(a, u16::from(byte))
    }

    fn flush_output(&mut self) -> Result<(), RuntimeError> {
        let at = self.at;
        self.output.flush().map_err(|e| RuntimeError::Io {
            at,
            message: e.to_string(),
        })
    }
}
