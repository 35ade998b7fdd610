use std::io::{self, Write};

use env_logger::fmt::Formatter;
use log::{LevelFilter, Record, debug};

fn write_line(buf: &mut Formatter, record: &Record<'_>) -> io::Result<()> {
    writeln!(buf, "{}: {} - {}", record.level(), record.target(), record.args())
}

/// Installs the stderr logger. Later calls only move the global max level.
pub fn init_logger(level: LevelFilter) {
    let installed = env_logger::Builder::new()
        .format(write_line)
        .target(env_logger::Target::Stderr)
        .filter_level(level)
        .try_init();

    log::set_max_level(level);
    if let Err(e) = installed {
        debug!("Logger already initialised, level now {}: {}", level, e);
    }
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    let lvl = match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => return None,
    };
    Some(lvl)
}

/// Initialises logging from a level name. Returns false for an unknown name.
pub fn set_log_level(level: &str) -> bool {
    match parse_level(level) {
        Some(lvl) => {
            init_logger(lvl);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_level_names() {
        assert_eq!(parse_level("warning"), Some(LevelFilter::Warn));
        assert_eq!(parse_level(" DEBUG "), Some(LevelFilter::Debug));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn reinitialising_only_changes_the_level() {
        init_logger(LevelFilter::Warn);
        init_logger(LevelFilter::Debug);
        assert_eq!(log::max_level(), LevelFilter::Debug);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(!set_log_level("verbose"));
    }
}
