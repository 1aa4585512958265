//! Logging and tracing configuration
//!
//! This module sets up the global subscriber for the service binary and
//! provides the `audit_event!` macro used to emit structured access-control
//! records. Console output goes to stderr so command output on stdout stays
//! machine readable; an optional daily-rolling JSON file receives the same
//! records.

use std::io;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::types::config::CliArgs;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Result of installing the global subscriber
pub type LoggingResult = Result<LoggingGuards, Box<dyn std::error::Error + Send + Sync>>;

/// Console record format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per record
    Json,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Maximum level for this crate's records
    pub level: Level,
    /// Console format
    pub format: LogFormat,
    /// Directory for the rolling JSON log file; `None` disables file output
    pub log_dir: Option<PathBuf>,
    /// File name prefix of the rolling log
    pub file_prefix: String,
    /// Emit a record when each instrumented span closes
    pub span_events: bool,
    /// ANSI colors on the pretty console format
    pub ansi: bool,
    /// Explicit filter directives, overriding `level` and `RUST_LOG`
    pub directives: Option<String>,
}

/// Keeps the non-blocking log writers alive; drop it to flush on shutdown
#[derive(Debug, Default)]
pub struct LoggingGuards {
    guards: Vec<WorkerGuard>,
}

impl LoggingGuards {
    /// Number of background writers held
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Whether no background writers are held
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Pretty,
            log_dir: None,
            file_prefix: "badge-access-control".to_string(),
            span_events: false,
            ansi: true,
            directives: None,
        }
    }
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the configuration from the binary's global flags
    ///
    /// `--debug` wins over `--verbose`; both turn on span close records.
    pub fn from_cli(args: &CliArgs) -> Self {
        let mut config = Self::new();
        if args.debug {
            config = config.with_level(Level::DEBUG).with_span_events();
        } else if args.verbose {
            config = config.with_level(Level::INFO).with_span_events();
        }
        if args.log_json {
            config = config.with_format(LogFormat::Json);
        }
        if let Some(dir) = &args.log_dir {
            config = config.with_log_dir(dir);
        }
        config
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the console format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Also write JSON records to a daily file in `dir`
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Set the rolling file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }

    /// Emit span close records
    pub fn with_span_events(mut self) -> Self {
        self.span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    /// Use explicit filter directives
    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn default_directive(&self) -> String {
        format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), self.level)
    }

    fn build_filter(&self) -> Result<EnvFilter, Box<dyn std::error::Error + Send + Sync>> {
        match &self.directives {
            Some(directives) => Ok(EnvFilter::try_new(directives)?),
            None => Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }

    fn console_layer(&self) -> BoxedLayer {
        match self.format {
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_span_events(self.span_events())
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(self.ansi)
                .with_span_events(self.span_events())
                .boxed(),
        }
    }

    /// Install the global tracing subscriber
    ///
    /// The returned guards must be held for as long as the file writer
    /// should keep flushing.
    pub fn init(self) -> LoggingResult {
        let filter = self.build_filter()?;
        let mut guards = LoggingGuards::default();
        let mut layers = vec![self.console_layer()];

        if let Some(dir) = &self.log_dir {
            let (writer, guard) = non_blocking(rolling::daily(dir, &self.file_prefix));
            guards.guards.push(guard);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_span_events(self.span_events())
                    .boxed(),
            );
        }

        Registry::default().with(layers).with(filter).try_init()?;

        info!(
            level = %self.level,
            format = ?self.format,
            log_dir = ?self.log_dir,
            "Logging initialized"
        );
        Ok(guards)
    }
}

/// Emit a structured access-control record at the given level
///
/// Every record carries `component = "access_control"` so audit records can
/// be filtered out of the general log stream.
#[macro_export]
macro_rules! audit_event {
    ($level:ident, $message:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::$level!(
            message = $message,
            component = "access_control",
            $($key = $value,)*
        );
    };
    ($level:ident, $message:expr) => {
        tracing::$level!(
            message = $message,
            component = "access_control",
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_are_quiet() {
        let config = LoggingConfig::new();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.log_dir.is_none());
        assert_eq!(config.file_prefix, "badge-access-control");
        assert!(config.ansi);
        assert_eq!(config.default_directive(), "badge_access_control=WARN");
    }

    #[test]
    fn test_builder() {
        let config = LoggingConfig::new()
            .with_level(Level::DEBUG)
            .with_format(LogFormat::Json)
            .with_log_dir("/var/log/acs")
            .with_file_prefix("gate")
            .with_span_events()
            .without_ansi()
            .with_directives("debug");

        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/acs")));
        assert_eq!(config.file_prefix, "gate");
        assert_eq!(config.span_events(), FmtSpan::CLOSE);
        assert!(!config.ansi);
        assert!(config.build_filter().is_ok());
    }

    #[test]
    fn test_from_cli_flags() {
        let args = CliArgs::try_parse_from(["test", "--debug", "--verbose", "--log-json"]).unwrap();
        let config = LoggingConfig::from_cli(&args);
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.span_events);

        let args = CliArgs::try_parse_from(["test", "--log-dir", "logs"]).unwrap();
        let config = LoggingConfig::from_cli(&args);
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
        assert_eq!(config.span_events(), FmtSpan::NONE);
    }
}
