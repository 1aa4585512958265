//! Demo data seeding
//!
//! Creates the demonstration users, departments, sensors, and barriers. Every
//! record is looked up by its unique key first, so seeding twice creates
//! nothing the second time.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument};

use crate::entities::{NewBarrier, NewDepartment, NewSensor, NewUser};
use crate::service::error::AccessControlResult;
use crate::store::EntityStore;
use crate::types::{DepartmentId, EntityKind, Role, SensorState, UserId};

/// What a seeding run created and what already existed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    /// Records created by this run, as `kind: key`
    pub created: Vec<String>,
    /// Records found already present, as `kind: key`
    pub existing: Vec<String>,
}

impl SeedReport {
    fn note(&mut self, created: bool, kind: EntityKind, key: &str) {
        let entry = format!("{}: {}", kind, key);
        if created {
            self.created.push(entry);
        } else {
            self.existing.push(entry);
        }
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Demo Data ===")?;
        writeln!(f, "Created: {}", self.created.len())?;
        for entry in &self.created {
            writeln!(f, "  + {}", entry)?;
        }
        write!(f, "Already present: {}", self.existing.len())?;
        for entry in &self.existing {
            write!(f, "\n  = {}", entry)?;
        }
        Ok(())
    }
}

/// Seed the demonstration data set into `store`
#[instrument(skip(store))]
pub fn seed_demo_data(store: &EntityStore) -> AccessControlResult<SeedReport> {
    let mut report = SeedReport::default();

    let admin = seed_user(store, &mut report, "admin", "admin@example.com", Role::Admin)?;
    let operator = seed_user(store, &mut report, "operator", "operator@example.com", Role::Operator)?;

    let reception = seed_department(store, &mut report, "Reception", "Main reception area", "Ground floor")?;
    let offices = seed_department(
        store,
        &mut report,
        "Administrative Offices",
        "Administrative staff offices",
        "Second floor",
    )?;
    let warehouse = seed_department(store, &mut report, "Warehouse", "Storage area", "Ground floor, north wing")?;

    seed_sensor(
        store,
        &mut report,
        NewSensor::new("RFID-001-AAA", "Main Admin Card")
            .in_department(reception)
            .assigned_to(admin)
            .with_description("Administrator master card"),
    )?;
    seed_sensor(
        store,
        &mut report,
        NewSensor::new("RFID-002-BBB", "Operator Card")
            .in_department(offices)
            .assigned_to(operator)
            .with_description("Operator access card"),
    )?;
    seed_sensor(
        store,
        &mut report,
        NewSensor::new("RFID-003-CCC", "Warehouse Card")
            .with_state(SensorState::Inactive)
            .in_department(warehouse)
            .with_description("Warehouse access card (temporarily disabled)"),
    )?;

    seed_barrier(
        store,
        &mut report,
        NewBarrier::new("Main Barrier", reception).with_description("Main building entrance"),
    )?;
    seed_barrier(
        store,
        &mut report,
        NewBarrier::new("Warehouse Barrier", warehouse).with_description("Warehouse area entrance"),
    )?;

    info!("Seeded demo data: {} created, {} already present", report.created.len(), report.existing.len());
    Ok(report)
}

fn seed_user(
    store: &EntityStore,
    report: &mut SeedReport,
    username: &str,
    email: &str,
    role: Role,
) -> AccessControlResult<UserId> {
    if let Some(user) = store.find_user_by_username(username) {
        report.note(false, EntityKind::User, username);
        return Ok(user.id);
    }
    let mut input = NewUser::new(username, role);
    input.email = Some(email.to_string());
    let user = store.create_user(input)?;
    report.note(true, EntityKind::User, username);
    Ok(user.id)
}

fn seed_department(
    store: &EntityStore,
    report: &mut SeedReport,
    name: &str,
    description: &str,
    location: &str,
) -> AccessControlResult<DepartmentId> {
    if let Some(department) = store.find_department_by_name(name) {
        report.note(false, EntityKind::Department, name);
        return Ok(department.id);
    }
    let department = store.create_department(NewDepartment::new(name, location).with_description(description))?;
    report.note(true, EntityKind::Department, name);
    Ok(department.id)
}

fn seed_sensor(store: &EntityStore, report: &mut SeedReport, input: NewSensor) -> AccessControlResult<()> {
    let uid = input.uid.clone();
    let created = store.find_sensor_by_uid(&uid).is_none();
    if created {
        store.create_sensor(input)?;
    }
    report.note(created, EntityKind::Sensor, &uid);
    Ok(())
}

fn seed_barrier(store: &EntityStore, report: &mut SeedReport, input: NewBarrier) -> AccessControlResult<()> {
    let name = input.name.clone();
    let created = store.find_barrier_by_name(&name).is_none();
    if created {
        store.create_barrier(input)?;
    }
    report.note(created, EntityKind::Barrier, &name);
    Ok(())
}
