//! Character input for the IN opcode.
//!
//! The VM owns its input source and asks it for one byte at a time. The
//! standard source reads whole lines and replays them byte by byte, with a
//! `\n` appended to every line.

use std::collections::VecDeque;
use std::io::{self, BufRead};

/// A blocking source of input bytes.
pub trait CharInput {
    /// Return the next byte, blocking until one is available.
    ///
    /// `Ok(None)` means the source is exhausted and never will yield again.
    /// An IN that sees it ends the run with [`RuntimeError::InputExhausted`].
    ///
    /// [`RuntimeError::InputExhausted`]: crate::RuntimeError::InputExhausted
    fn next_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Line-buffered input over any [`BufRead`].
///
/// A line is read only when the previous one has been fully consumed. The
/// line terminator (`\n` or `\r\n`) is normalised to a single `\n`, and one is
/// synthesised for a final line that lacks it.
#[derive(Debug)]
pub struct LineInput<R> {
    reader: R,
    pending: VecDeque<u8>,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn refill(&mut self) -> io::Result<bool> {
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(false);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        self.pending.extend(line);
        self.pending.push_back(b'\n');
        Ok(true)
    }
}

impl<R: BufRead> CharInput for LineInput<R> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if self.pending.is_empty() && !self.refill()? {
            return Ok(None);
        }
        Ok(self.pending.pop_front())
    }
}

/// Input that is always exhausted. For programs that never read.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl CharInput for NoInput {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(None)
    }
}

impl<T: CharInput + ?Sized> CharInput for &mut T {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).next_byte()
    }
}
