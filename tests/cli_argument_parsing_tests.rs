//! Tests for CLI argument parsing functionality
//!
//! These tests verify that global flags and subcommands are parsed and that
//! CLI values override the configuration file.

use badge_access_control::types::config::{CliArgs, Command};
use badge_access_control::AccessControlConfig;
use clap::Parser;
use tempfile::TempDir;

/// No subcommand runs with defaults
#[test]
fn test_defaults_without_subcommand() {
    let args = CliArgs::try_parse_from(["test"]).unwrap();
    assert!(args.command.is_none());
    assert_eq!(args.as_user, "admin");
    assert!(!args.verbose);
    assert!(!args.debug);
    assert!(!args.print_config);

    let config = AccessControlConfig::from_cli_args(&args).unwrap();
    assert_eq!(config, AccessControlConfig::default());
}

/// Verify takes an optional uid and barrier
#[test]
fn test_verify_subcommand() {
    let args = CliArgs::try_parse_from(["test", "verify", "--uid", "RFID-001-AAA", "--barrier", "Main Barrier"]).unwrap();
    match args.command {
        Some(Command::Verify { uid, barrier }) => {
            assert_eq!(uid.as_deref(), Some("RFID-001-AAA"));
            assert_eq!(barrier.as_deref(), Some("Main Barrier"));
        }
        other => panic!("unexpected command: {:?}", other),
    }

    let args = CliArgs::try_parse_from(["test", "verify"]).unwrap();
    assert!(matches!(args.command, Some(Command::Verify { uid: None, barrier: None })));
}

/// Open and close require a barrier
#[test]
fn test_barrier_commands_require_barrier() {
    let args = CliArgs::try_parse_from(["test", "open", "--barrier", "BAR_1"]).unwrap();
    assert!(matches!(args.command, Some(Command::Open { ref barrier }) if barrier == "BAR_1"));

    let args = CliArgs::try_parse_from(["test", "close", "--barrier", "Warehouse Barrier"]).unwrap();
    assert!(matches!(args.command, Some(Command::Close { .. })));

    assert!(CliArgs::try_parse_from(["test", "open"]).is_err());
}

/// Global flags are accepted after the subcommand
#[test]
fn test_global_flags_after_subcommand() {
    let args = CliArgs::try_parse_from([
        "test",
        "open",
        "--barrier",
        "Main Barrier",
        "--as-user",
        "operator",
        "--lock-timeout-ms",
        "500",
        "--verbose",
    ])
    .unwrap();

    assert_eq!(args.as_user, "operator");
    assert_eq!(args.lock_timeout_ms, Some(500));
    assert!(args.verbose);
}

/// Event filters parse into the events subcommand
#[test]
fn test_events_filters() {
    let args = CliArgs::try_parse_from([
        "test",
        "events",
        "--type",
        "ACCESS_DENIED",
        "--sensor",
        "RFID-003-CCC",
        "--since",
        "2026-01-01T00:00:00Z",
    ])
    .unwrap();

    match args.command {
        Some(Command::Events { event_type, sensor, barrier, since, until, stats }) => {
            assert_eq!(event_type.as_deref(), Some("ACCESS_DENIED"));
            assert_eq!(sensor.as_deref(), Some("RFID-003-CCC"));
            assert!(barrier.is_none());
            assert_eq!(since.as_deref(), Some("2026-01-01T00:00:00Z"));
            assert!(until.is_none());
            assert!(!stats);
        }
        other => panic!("unexpected command: {:?}", other),
    }

    let args = CliArgs::try_parse_from(["test", "events", "--stats"]).unwrap();
    assert!(matches!(args.command, Some(Command::Events { stats: true, .. })));
}

/// List takes the record kind positionally
#[test]
fn test_list_subcommand() {
    let args = CliArgs::try_parse_from(["test", "list", "sensors"]).unwrap();
    assert!(matches!(args.command, Some(Command::List { ref kind }) if kind == "sensors"));
}

/// Unknown subcommands are rejected
#[test]
fn test_unknown_subcommand_rejected() {
    assert!(CliArgs::try_parse_from(["test", "teleport"]).is_err());
}

/// CLI values take precedence over the configuration file
#[test]
fn test_cli_overrides_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("access.json");
    std::fs::write(&path, r#"{"lock_timeout_ms": 1000, "data_dir": "/srv/access", "seed_demo_data": true}"#).unwrap();
    let path = path.display().to_string();

    let args = CliArgs::try_parse_from(["test", "--config", path.as_str()]).unwrap();
    let config = AccessControlConfig::from_cli_args(&args).unwrap();
    assert_eq!(config.lock_timeout_ms, 1000);
    assert_eq!(config.data_dir, "/srv/access");
    assert!(config.seed_demo_data);

    let args =
        CliArgs::try_parse_from(["test", "--config", path.as_str(), "--lock-timeout-ms", "50", "--data-dir", "/tmp/acs"])
            .unwrap();
    let config = AccessControlConfig::from_cli_args(&args).unwrap();
    assert_eq!(config.lock_timeout_ms, 50);
    assert_eq!(config.data_dir, "/tmp/acs");
    assert!(config.seed_demo_data);
    assert!(config.validate().is_ok());
}

/// A missing configuration file is an error
#[test]
fn test_missing_config_file() {
    let args = CliArgs::try_parse_from(["test", "--config", "/nonexistent/access.json"]).unwrap();
    assert!(AccessControlConfig::from_cli_args(&args).is_err());
}
