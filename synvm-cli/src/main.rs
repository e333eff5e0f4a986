//! synvm CLI — load a program image and run it on stdin/stdout.
//!
//! Exit codes:
//! - 0: Success (HALT, RET with empty stack, or end of memory)
//! - 1: Usage, read, or image decode error
//! - 2: Runtime error

mod commands;
mod logger;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut verbose = false;
    let mut image = None;
    for arg in &args {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "--verbose" | "-v" => verbose = true,
            flag if flag.starts_with('-') => {
                eprintln!("error: unknown option '{flag}'");
                eprintln!();
                print_usage();
                process::exit(1);
            }
            path if image.is_none() => image = Some(path),
            extra => {
                eprintln!("error: unexpected argument '{extra}'");
                process::exit(1);
            }
        }
    }

    let Some(image) = image else {
        print_usage();
        process::exit(1);
    };

    logger::init(verbose);

    if let Err(code) = commands::run(image) {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: synvm [--verbose] <image>");
    eprintln!();
    eprintln!("Runs a little-endian 16-bit word image. Program output goes to");
    eprintln!("stdout; IN reads stdin one line at a time.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --verbose   Log run start and exit reason to stderr");
    eprintln!("  -h, --help      Show this message");
}
