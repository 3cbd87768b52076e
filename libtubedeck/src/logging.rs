//! Logging setup shared by the library and the `tubedeck` binary
//!
//! All output goes to stderr so stdout stays reserved for command results.
//!
//! Environment:
//! - `TUBEDECK_LOG_FORMAT`: `text` (default), `json` or `pretty`
//! - `TUBEDECK_LOG_LEVEL`: an `EnvFilter` directive, default `warn`
//! - `RUST_LOG`: when set, overrides both the level and `--verbose`
//!
//! ```no_run
//! use libtubedeck::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::from_env().verbose(true).init();
//! # let _ = LogFormat::Json;
//! ```

use std::str::FromStr;
use tracing_subscriber::EnvFilter;

pub const FORMAT_ENV: &str = "TUBEDECK_LOG_FORMAT";
pub const LEVEL_ENV: &str = "TUBEDECK_LOG_LEVEL";

const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain single-line output, no colors
    #[default]
    Text,
    /// One JSON object per event
    Json,
    /// Multi-line colored output for development
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!(
                "Unknown log format '{}' (expected text, json or pretty)",
                other
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: DEFAULT_LEVEL.to_string(),
            verbose: false,
        }
    }
}

impl LoggingConfig {
    /// Read format and level from the environment
    ///
    /// An unparseable format falls back to text.
    pub fn from_env() -> Self {
        let format = std::env::var(FORMAT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let level = std::env::var(LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LEVEL.to_string());

        Self {
            format,
            level,
            verbose: false,
        }
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Raise the level to `debug` unless `RUST_LOG` says otherwise
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The directive handed to `EnvFilter` when `RUST_LOG` is unset
    pub fn directive(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.level
        }
    }

    /// Install the global subscriber
    ///
    /// A second call is a no-op.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.directive()));

        let installed = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .flatten_event(true)
                .with_current_span(false)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false)
                .try_init(),
        };

        if installed.is_err() {
            tracing::debug!("logging already initialized");
        }
    }
}

/// Initialize logging from the environment only
pub fn init_default() {
    LoggingConfig::from_env().init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);

        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("Unknown log format 'xml'"));
    }

    #[test]
    fn test_log_format_display() {
        for format in [LogFormat::Text, LogFormat::Json, LogFormat::Pretty] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_verbose_overrides_level() {
        let config = LoggingConfig::default();
        assert_eq!(config.directive(), "warn");
        assert_eq!(config.verbose(true).directive(), "debug");
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(FORMAT_ENV, "json");
        std::env::set_var(LEVEL_ENV, "libtubedeck=trace");

        let config = LoggingConfig::from_env();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "libtubedeck=trace");

        std::env::set_var(FORMAT_ENV, "bogus");
        std::env::remove_var(LEVEL_ENV);
        assert_eq!(LoggingConfig::from_env(), LoggingConfig::default());

        std::env::remove_var(FORMAT_ENV);
    }
}
