//! Logger setup for the shell.
//!
//! Status lines own stdout, so records go to `ingestion.log` in the working
//! directory unless `INGESTION_LOG` asks for `terminal` or `both`.

use std::env;
use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const LOG_ENV: &str = "INGESTION_LOG";
pub const LOG_FILENAME: &str = "ingestion.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    #[default]
    File,
    Terminal,
    Both,
}

impl LogDestination {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Some(LogDestination::File),
            "terminal" | "term" | "stderr" => Some(LogDestination::Terminal),
            "both" => Some(LogDestination::Both),
            _ => None,
        }
    }

    /// Reads `INGESTION_LOG`; unset or unrecognised values mean `File`.
    pub fn from_env() -> Self {
        match env::var(LOG_ENV) {
            Ok(raw) => Self::parse(&raw).unwrap_or_else(|| {
                eprintln!("Warning: unknown {LOG_ENV}={raw:?}, logging to {LOG_FILENAME}");
                LogDestination::default()
            }),
            Err(_) => LogDestination::default(),
        }
    }

    fn wants_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }

    fn wants_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }
}

/// Installs the global logger. A log file that cannot be created is
/// reported on stderr and skipped.
pub fn initialize(destination: LogDestination, level: LevelFilter, dir: &Path) {
    let loggers = build_loggers(destination, level, &dir.join(LOG_FILENAME));
    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

fn build_loggers(
    destination: LogDestination,
    level: LevelFilter,
    log_path: &Path,
) -> Vec<Box<dyn SharedLogger>> {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if destination.wants_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if destination.wants_file() {
        match File::create(log_path) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err),
        }
    }
    loggers
}
