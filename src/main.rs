// Badge Access Control - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/badge-access-control seed
// $ ./target/release/badge-access-control verify --uid RFID-001-AAA
// ```
//
// Or acting as another user with a custom data directory:
//
// ```console
// $ ./target/release/badge-access-control --as-user operator --data-dir /tmp/access open --barrier "Main Barrier"
// ```

use anyhow::{anyhow, bail, Context};
use badge_access_control::events::EventFilter;
use badge_access_control::service::{with_retry, LoggingConfig, RetryPolicy};
use badge_access_control::types::config::{CliArgs, Command};
use badge_access_control::types::{AccessControlConfig, BarrierId, EntityKind, EventType, SensorId};
use badge_access_control::{seed_demo_data, AccessControlService, Caller, ErrorResponse, VerifyAccessRequest};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::process;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match AccessControlConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let _guards = match LoggingConfig::from_cli(&args).init() {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        error!("Command failed: {:#}", e);
        match e.downcast_ref::<badge_access_control::AccessControlError>() {
            Some(access_error) => {
                let response = ErrorResponse::from(access_error);
                match serde_json::to_string_pretty(&response) {
                    Ok(json) => eprintln!("{}", json),
                    Err(_) => eprintln!("Error: {:#}", e),
                }
            }
            None => eprintln!("Error: {:#}", e),
        }
        process::exit(1);
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = AccessControlConfig::from_cli_args(&args).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    info!("Configuration loaded and validated successfully");

    let service = AccessControlService::open(&config)
        .with_context(|| format!("Failed to open data directory {}", config.data_dir))?;

    if config.seed_demo_data {
        seed_demo_data(service.store()).context("Failed to seed demo data")?;
    }

    let Some(command) = args.command else {
        print_summary(&service, &config);
        return Ok(());
    };

    let outcome = execute(&service, &args.as_user, command);
    // Entity changes are persisted even when the command itself failed.
    service
        .save_snapshot(&config.snapshot_path())
        .context("Failed to save entity snapshot")?;
    outcome
}

fn execute(service: &AccessControlService, as_user: &str, command: Command) -> anyhow::Result<()> {
    let retry = RetryPolicy::default();

    match command {
        Command::Seed => {
            let report = seed_demo_data(service.store())?;
            println!("{}", report);
        }
        Command::Verify { uid, barrier } => {
            let caller = caller(service, as_user)?;
            let barrier_id = barrier.map(|b| resolve_barrier(service, &b)).transpose()?;
            let request = VerifyAccessRequest { uid, barrier_id };
            let decision = with_retry(retry, || service.verify_access(&caller, &request))?;
            println!("{}", serde_json::to_string_pretty(&decision.response())?);
            eprintln!("Status: {}", decision.status_code());
        }
        Command::Open { barrier } => {
            let caller = caller(service, as_user)?;
            let barrier_id = resolve_barrier(service, &barrier)?;
            let barrier = with_retry(retry, || service.manual_open(&caller, barrier_id))?;
            println!("{}", serde_json::to_string_pretty(&barrier)?);
        }
        Command::Close { barrier } => {
            let caller = caller(service, as_user)?;
            let barrier_id = resolve_barrier(service, &barrier)?;
            let barrier = with_retry(retry, || service.manual_close(&caller, barrier_id))?;
            println!("{}", serde_json::to_string_pretty(&barrier)?);
        }
        Command::Events { event_type, sensor, barrier, since, until, stats } => {
            let caller = caller(service, as_user)?;
            if stats {
                println!("{}", service.event_statistics(&caller)?);
                return Ok(());
            }

            let mut filter = EventFilter::new();
            if let Some(event_type) = event_type {
                filter = filter.of_type(event_type.parse::<EventType>().map_err(|e| anyhow!(e))?);
            }
            if let Some(sensor) = sensor {
                filter = filter.for_sensor(resolve_sensor(service, &sensor)?);
            }
            if let Some(barrier) = barrier {
                filter = filter.for_barrier(resolve_barrier(service, &barrier)?);
            }
            if let Some(since) = since {
                filter = filter.since(parse_timestamp("since", &since)?);
            }
            if let Some(until) = until {
                filter = filter.until(parse_timestamp("until", &until)?);
            }

            for event in service.query_events(&caller, &filter)? {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
        Command::List { kind } => {
            let caller = caller(service, as_user)?;
            let kind = kind.parse::<EntityKind>().map_err(|e| anyhow!(e))?;
            let json = match kind {
                EntityKind::User => serde_json::to_string_pretty(&service.list_users(&caller)?)?,
                EntityKind::Department => serde_json::to_string_pretty(&service.list_departments(&caller)?)?,
                EntityKind::Sensor => serde_json::to_string_pretty(&service.list_sensors(&caller)?)?,
                EntityKind::Barrier => serde_json::to_string_pretty(&service.list_barriers(&caller)?)?,
                EntityKind::Event => serde_json::to_string_pretty(&service.query_events(&caller, &EventFilter::new())?)?,
            };
            println!("{}", json);
        }
    }
    Ok(())
}

/// Resolve the acting user named on the command line
fn caller(service: &AccessControlService, username: &str) -> anyhow::Result<Caller> {
    let actor = service
        .actor_for_username(username)
        .with_context(|| format!("Cannot act as '{}'", username))?;
    Ok(Caller::from(actor))
}

/// Accept either a barrier id or a barrier name
fn resolve_barrier(service: &AccessControlService, value: &str) -> anyhow::Result<BarrierId> {
    if let Ok(id) = value.parse::<BarrierId>() {
        return Ok(id);
    }
    match service.store().find_barrier_by_name(value) {
        Some(barrier) => Ok(barrier.id),
        None => bail!("No barrier with id or name '{}'", value),
    }
}

/// Accept either a sensor id or a badge uid
fn resolve_sensor(service: &AccessControlService, value: &str) -> anyhow::Result<SensorId> {
    if let Ok(id) = value.parse::<SensorId>() {
        return Ok(id);
    }
    match service.store().find_sensor_by_uid(value) {
        Some(sensor) => Ok(sensor.id),
        None => bail!("No sensor with id or uid '{}'", value),
    }
}

fn parse_timestamp(field: &str, value: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("Invalid --{} timestamp '{}'", field, value))
}

/// Print a short overview of the stored data
fn print_summary(service: &AccessControlService, config: &AccessControlConfig) {
    let store = service.store();
    eprintln!("Badge Access Control");
    eprintln!("====================");
    eprintln!("Data directory: {}", config.data_dir);
    eprintln!("  Users: {}", store.user_count());
    eprintln!("  Departments: {}", store.department_count());
    eprintln!("  Sensors: {}", store.sensor_count());
    eprintln!("  Barriers: {}", store.barrier_count());
    eprintln!("  Events: {}", service.events().len());
    eprintln!();
    eprintln!("Run with --help to list the available commands.");
}
