//! Log output for tests
//!
//! The container logs registrations and injections at `debug`, rebinding of
//! roles at `warn`. Tests call [`init_test_tracing`] to see them; the level
//! comes from the `WIRED_LOG` environment variable.

use tracing::Level;

/// Environment variable selecting the log level
pub const LOG_LEVEL_VAR: &str = "WIRED_LOG";

/// Map a level name to a tracing level, `INFO` for anything unknown.
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install a subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let level = std::env::var(LOG_LEVEL_VAR)
        .map(|name| parse_level(&name))
        .unwrap_or(Level::WARN);

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_init_twice() {
        init_test_tracing();
        init_test_tracing();
    }
}
