//! Configuration structures for the access control core
//!
//! This module contains the service configuration structure, the command line
//! arguments of the `badge-access-control` binary, and validation logic.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration values
pub mod defaults {
    /// Default time a request waits for a per-entity lock, in milliseconds
    pub const LOCK_TIMEOUT_MS: u64 = 250;

    /// Upper bound for the lock timeout, in milliseconds
    pub const MAX_LOCK_TIMEOUT_MS: u64 = 30_000;

    /// Default data directory for the snapshot and event journal
    pub const DATA_DIR: &str = "data";

    /// Default entity snapshot file name
    pub const SNAPSHOT_FILE: &str = "entities.json";

    /// Default event journal file name
    pub const EVENT_JOURNAL_FILE: &str = "events.jsonl";
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "badge-access-control",
    version = "0.1.0",
    about = "Badge Access Control - access decisions, barrier commands, and audit events",
    long_about = "Evaluates RFID badge credentials against sensor and barrier state, applies manual barrier commands, and records an immutable audit event for every decision.

EXAMPLES:
    # Create the demo users, departments, sensors, and barriers
    badge-access-control seed

    # Verify a badge
    badge-access-control verify --uid RFID-001-AAA

    # Open a barrier as the operator account
    badge-access-control --as-user operator open --barrier BAR_...

    # Show the most recent denials
    badge-access-control events --type ACCESS_DENIED

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Use --print-config to generate a template configuration file."
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Directory holding the entity snapshot and event journal
    #[arg(long, global = true, help = "Data directory for snapshot and event journal")]
    pub data_dir: Option<String>,

    /// Per-entity lock timeout in milliseconds
    #[arg(
        long,
        global = true,
        help = "Per-entity lock timeout in milliseconds",
        long_help = "Maximum time a request waits for a sensor or barrier lock before failing with a retryable busy error. Default: 250"
    )]
    pub lock_timeout_ms: Option<u64>,

    /// Username the command runs as
    #[arg(long, global = true, default_value = "admin", help = "Username to act as")]
    pub as_user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    /// Emit console log records as JSON
    #[arg(long, global = true, help = "Emit console log records as JSON")]
    pub log_json: bool,

    /// Directory for a daily rolling JSON log file
    #[arg(long, global = true, help = "Also write JSON log records to a daily file in this directory")]
    pub log_dir: Option<String>,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands of the `badge-access-control` binary
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create the demo data set if it does not exist yet
    Seed,
    /// Verify a badge credential
    Verify {
        /// Badge uid presented to the reader
        #[arg(long)]
        uid: Option<String>,
        /// Barrier the badge was presented at
        #[arg(long)]
        barrier: Option<String>,
    },
    /// Open a barrier manually
    Open {
        /// Barrier identifier
        #[arg(long)]
        barrier: String,
    },
    /// Close a barrier manually
    Close {
        /// Barrier identifier
        #[arg(long)]
        barrier: String,
    },
    /// Query the event log (newest first)
    Events {
        /// Only events of this type
        #[arg(long = "type")]
        event_type: Option<String>,
        /// Only events referencing this sensor
        #[arg(long)]
        sensor: Option<String>,
        /// Only events referencing this barrier
        #[arg(long)]
        barrier: Option<String>,
        /// Only events at or after this RFC 3339 timestamp
        #[arg(long)]
        since: Option<String>,
        /// Only events at or before this RFC 3339 timestamp
        #[arg(long)]
        until: Option<String>,
        /// Print aggregate statistics instead of events
        #[arg(long)]
        stats: bool,
    },
    /// List records of one kind
    List {
        /// users, departments, sensors, or barriers
        kind: String,
    },
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Per-entity lock timeout in milliseconds
    pub lock_timeout_ms: Option<u64>,

    /// Directory holding the entity snapshot and event journal
    pub data_dir: Option<String>,

    /// Entity snapshot file name inside the data directory
    pub snapshot_file: Option<String>,

    /// Event journal file name inside the data directory
    pub event_journal_file: Option<String>,

    /// Whether to create the demo data set on startup
    pub seed_demo_data: Option<bool>,
}

/// Configuration for the access control service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessControlConfig {
    /// Per-entity lock timeout in milliseconds
    pub lock_timeout_ms: u64,

    /// Directory holding the entity snapshot and event journal
    pub data_dir: String,

    /// Entity snapshot file name inside the data directory
    pub snapshot_file: String,

    /// Event journal file name inside the data directory
    pub event_journal_file: String,

    /// Whether to create the demo data set on startup
    pub seed_demo_data: bool,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for the service configuration
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigValidationError {
    /// Lock timeout is zero or above the maximum
    #[error("Lock timeout must be between 1 and {max} ms, got {value}")]
    InvalidLockTimeout {
        /// The configured timeout
        value: u64,
        /// The maximum accepted timeout
        max: u64,
    },

    /// A path setting is empty
    #[error("Path setting {0} must not be empty")]
    EmptyPath(&'static str),
}

impl Default for AccessControlConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: defaults::LOCK_TIMEOUT_MS,
            data_dir: defaults::DATA_DIR.to_string(),
            snapshot_file: defaults::SNAPSHOT_FILE.to_string(),
            event_journal_file: defaults::EVENT_JOURNAL_FILE.to_string(),
            seed_demo_data: false,
        }
    }
}

impl AccessControlConfig {
    /// Create configuration from parsed CLI arguments and the optional config file
    pub fn from_cli_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file, merging with defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                let config_file: ConfigFile = serde_json::from_str(&content)?;
                Ok(Self::from_config_file(config_file))
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    fn from_config_file(config_file: ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            lock_timeout_ms: config_file.lock_timeout_ms.unwrap_or(defaults.lock_timeout_ms),
            data_dir: config_file.data_dir.unwrap_or(defaults.data_dir),
            snapshot_file: config_file.snapshot_file.unwrap_or(defaults.snapshot_file),
            event_journal_file: config_file
                .event_journal_file
                .unwrap_or(defaults.event_journal_file),
            seed_demo_data: config_file.seed_demo_data.unwrap_or(defaults.seed_demo_data),
        }
    }

    fn apply_cli_overrides(config: &mut Self, args: &CliArgs) {
        if let Some(value) = args.lock_timeout_ms {
            config.lock_timeout_ms = value;
        }
        if let Some(value) = &args.data_dir {
            config.data_dir = value.clone();
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.lock_timeout_ms == 0 || self.lock_timeout_ms > defaults::MAX_LOCK_TIMEOUT_MS {
            return Err(ConfigValidationError::InvalidLockTimeout {
                value: self.lock_timeout_ms,
                max: defaults::MAX_LOCK_TIMEOUT_MS,
            });
        }

        if self.data_dir.trim().is_empty() {
            return Err(ConfigValidationError::EmptyPath("data_dir"));
        }
        if self.snapshot_file.trim().is_empty() {
            return Err(ConfigValidationError::EmptyPath("snapshot_file"));
        }
        if self.event_journal_file.trim().is_empty() {
            return Err(ConfigValidationError::EmptyPath("event_journal_file"));
        }

        Ok(())
    }

    /// Lock timeout as a `Duration`
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Full path of the entity snapshot
    pub fn snapshot_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.snapshot_file)
    }

    /// Full path of the event journal
    pub fn event_journal_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.event_journal_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AccessControlConfig::default();
        assert_eq!(config.lock_timeout_ms, 250);
        assert!(!config.seed_demo_data);
        assert!(config.validate().is_ok());
        assert_eq!(config.lock_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_lock_timeout() {
        let config = AccessControlConfig { lock_timeout_ms: 0, ..Default::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidLockTimeout { value: 0, .. })
        ));

        let config = AccessControlConfig { lock_timeout_ms: 60_000, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_paths_rejected() {
        let config = AccessControlConfig { data_dir: "  ".to_string(), ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyPath("data_dir")));

        let config =
            AccessControlConfig { event_journal_file: String::new(), ..Default::default() };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::EmptyPath("event_journal_file"))
        );
    }

    #[test]
    fn test_paths_join_data_dir() {
        let config = AccessControlConfig { data_dir: "/var/lib/acs".to_string(), ..Default::default() };
        assert_eq!(config.snapshot_path(), PathBuf::from("/var/lib/acs/entities.json"));
        assert_eq!(config.event_journal_path(), PathBuf::from("/var/lib/acs/events.jsonl"));
    }

    #[test]
    fn test_partial_config_file_merges_defaults() {
        let file: ConfigFile = serde_json::from_str(r#"{"lock_timeout_ms": 1000}"#).unwrap();
        let config = AccessControlConfig::from_config_file(file);
        assert_eq!(config.lock_timeout_ms, 1000);
        assert_eq!(config.data_dir, defaults::DATA_DIR);
    }
}
