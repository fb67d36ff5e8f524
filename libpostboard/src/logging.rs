//! Logging setup for applications embedding Postboard
//!
//! The library itself only emits `tracing` events; hosts call one of these
//! initialisers once at startup to decide where they go.
//!
//! # Examples
//!
//! ```no_run
//! use libpostboard::logging::{LoggingConfig, LogFormat};
//!
//! let config = LoggingConfig::new(LogFormat::Json, "info".to_string(), false);
//! config.init();
//!
//! // Or honour POSTBOARD_LOG_FORMAT / POSTBOARD_LOG_LEVEL
//! libpostboard::logging::init_default();
//! ```
//!
//! Hosts that may already have a subscriber (test harnesses, plugins) use the
//! fallible variant:
//!
//! ```
//! use libpostboard::logging::{try_init_default, LogFormat, LoggingConfig};
//!
//! try_init_default().expect("no subscriber installed yet");
//! assert!(LoggingConfig::new(LogFormat::Text, "info".to_string(), false)
//!     .try_init()
//!     .is_err());
//! ```

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "POSTBOARD_LOG_FORMAT";
pub const LOG_LEVEL_ENV: &str = "POSTBOARD_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain text, no colors
    Text,
    /// One JSON object per line
    Json,
    /// Multi-line with colors, for development
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Invalid log format: '{}'. Valid options: text, json, pretty",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    /// Forces `debug` unless `RUST_LOG` says otherwise
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Filter used by [`LoggingConfig::init`]; `RUST_LOG` wins when set
    pub fn filter(&self) -> EnvFilter {
        let fallback = if self.verbose { "debug" } else { self.level.as_str() };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    }

    /// Install the global subscriber
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been installed. Use
    /// [`LoggingConfig::try_init`] where that can happen.
    pub fn init(&self) {
        if let Err(err) = self.try_init() {
            panic!("Failed to install tracing subscriber: {}", err);
        }
    }

    /// Install the global subscriber, failing if one is already set
    pub fn try_init(&self) -> Result<(), TryInitError> {
        let filter = self.filter();

        match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .flatten_event(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .try_init(),
        }
    }

    /// Settings from `POSTBOARD_LOG_FORMAT` and `POSTBOARD_LOG_LEVEL`
    ///
    /// Unset or unparsable values fall back to text output at `info`.
    pub fn from_env() -> Self {
        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LogFormat::Text);

        let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| "info".to_string());

        Self::new(format, level, false)
    }
}

/// Error returned when a global subscriber is already installed
pub type TryInitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Initialise logging from `POSTBOARD_LOG_FORMAT` and `POSTBOARD_LOG_LEVEL`
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
pub fn init_default() {
    LoggingConfig::from_env().init();
}

/// Like [`init_default`], but reports an already-installed subscriber
pub fn try_init_default() -> Result<(), TryInitError> {
    LoggingConfig::from_env().try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }

    #[test]
    fn test_log_format_from_str_invalid() {
        let result = "yaml".parse::<LogFormat>();
        assert!(result.unwrap_err().contains("Invalid log format: 'yaml'"));
    }

    #[test]
    fn test_log_format_display() {
        assert_eq!(LogFormat::Text.to_string(), "text");
        assert_eq!(LogFormat::Json.to_string(), "json");
        assert_eq!(LogFormat::Pretty.to_string(), "pretty");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_format_and_level() {
        std::env::set_var(LOG_FORMAT_ENV, "json");
        std::env::set_var(LOG_LEVEL_ENV, "warn");
        let config = LoggingConfig::from_env();
        std::env::remove_var(LOG_FORMAT_ENV);
        std::env::remove_var(LOG_LEVEL_ENV);

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "warn");
        assert!(!config.verbose);

        std::env::set_var(LOG_FORMAT_ENV, "yaml");
        let fallback = LoggingConfig::from_env();
        std::env::remove_var(LOG_FORMAT_ENV);

        assert_eq!(fallback.format, LogFormat::Text);
        assert_eq!(fallback.level, "info");
    }

    // The only test in this binary that touches the global subscriber
    #[test]
    #[serial]
    fn test_subscriber_installs_once() {
        std::env::set_var(LOG_FORMAT_ENV, "text");
        let first = try_init_default();
        std::env::remove_var(LOG_FORMAT_ENV);
        assert!(first.is_ok());

        tracing::info!("subscriber installed");

        let second = LoggingConfig::new(LogFormat::Json, "debug".to_string(), false).try_init();
        assert!(second.is_err());
    }

    #[test]
    #[serial]
    fn test_filter_uses_level_without_rust_log() {
        std::env::remove_var("RUST_LOG");

        let quiet = LoggingConfig::new(LogFormat::Text, "warn".to_string(), false);
        assert_eq!(quiet.filter().max_level_hint(), Some(LevelFilter::WARN));

        let verbose = LoggingConfig::new(LogFormat::Text, "warn".to_string(), true);
        assert_eq!(verbose.filter().max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
