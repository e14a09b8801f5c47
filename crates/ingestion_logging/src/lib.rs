#![deny(missing_docs)]
//! Logging front door for the ingestion crates.
//!
//! `ingestion_core` and `ingestion_engine` never install a logger: they log
//! drops, start/cancel decisions and job outcomes through the `ingest_*`
//! macros below, and only `ingestion_app` picks the sink (log file or
//! terminal). Callers of the macros need `log` as a direct dependency.
//! Integration tests call [`initialize_for_tests`] to see those records.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! ingest_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! ingest_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! ingest_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! ingest_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! ingest_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Level used by [`initialize_for_tests`]: debug in debug builds, info otherwise.
pub fn test_level() -> log::LevelFilter {
    if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}

/// Initializes a simple terminal logger for use in tests.
///
/// Safe to call from every test: it no-ops if another logger has already
/// been installed in the process.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let _ = CombinedLogger::init(vec![TermLogger::new(
        test_level(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
