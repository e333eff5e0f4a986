//! CLI command implementations.

use std::io::{self, Write};

use log::debug;
use synvm_common::Program;
use synvm_vm::LineInput;

/// Load an image and execute it against stdin/stdout.
pub fn run(path: &str) -> Result<(), i32> {
    let program = Program::load(path).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    debug!("loaded {} words from '{path}'", program.len());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let input = LineInput::new(stdin.lock());
    let mut output = stdout.lock();

    match synvm_vm::run(program, input, &mut output) {
        Ok(exit) => {
            debug!("program {exit}");
            write_trailer(&mut output);
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(2)
        }
    }
}

/// The program's own output is already flushed; a failed trailer does not
/// change the exit status.
fn write_trailer(output: &mut impl Write) {
    if let Err(e) = writeln!(output, "--------------\nProgram exited") {
        debug!("could not write exit trailer: {e}");
    }
}
