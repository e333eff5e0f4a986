//! `env_logger` backend writing `[LEVEL] message` lines to stderr.

use std::io::Write;

use log::LevelFilter;

fn level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    }
}

/// Install the logger. Silent unless `verbose`.
pub fn init(verbose: bool) {
    // Fails only when a logger is already installed.
    let _ = env_logger::Builder::new()
        .filter_level(level(verbose))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_unless_verbose() {
        assert_eq!(level(false), LevelFilter::Off);
        assert_eq!(level(true), LevelFilter::Debug);
    }
}
