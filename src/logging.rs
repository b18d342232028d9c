//! Logging initialization for dsforum.
//!
//! Log lines go to stdout and to the configured log file. A `RUST_LOG`
//! environment variable overrides the configured level entirely.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Resolve a configured level string, falling back to `info` on junk input.
fn level_or_default(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level_or_default(level).into()))
}

/// Initialize logging to stdout and the log file named in the config.
///
/// The log file's parent directory is created if needed; the file is
/// truncated on startup.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.file).parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = Arc::new(File::create(&config.file)?);

    tracing_subscriber::fmt()
        .with_env_filter(filter_for(&config.level))
        .with_writer(std::io::stdout.and(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Console-only logging, used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_or_default() {
        assert_eq!(level_or_default("trace"), Level::TRACE);
        assert_eq!(level_or_default("DEBUG"), Level::DEBUG);
        assert_eq!(level_or_default(" warn "), Level::WARN);
        assert_eq!(level_or_default("error"), Level::ERROR);
    }

    #[test]
    fn test_junk_level_falls_back_to_info() {
        assert_eq!(level_or_default("verbose"), Level::INFO);
        assert_eq!(level_or_default(""), Level::INFO);
    }
}
