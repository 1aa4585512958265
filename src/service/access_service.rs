//! Access control service
//!
//! This module contains the [`AccessControlService`], the inbound surface of
//! the core. It resolves callers, checks the authorization policy, and routes
//! each request to the entity store, the access decision engine, the barrier
//! controller, or the event log. Authorization failures never produce events.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::access::{AccessDecisionEngine, BarrierController, Decision};
use crate::audit_event;
use crate::entities::{
    Barrier, BarrierUpdate, Department, DepartmentUpdate, NewBarrier, NewDepartment, NewSensor, NewUser,
    Sensor, SensorUpdate, User, UserUpdate,
};
use crate::events::{Event, EventFilter, EventLog, EventStatistics};
use crate::permissions::{Actor, Caller, Operation};
use crate::service::error::{AccessControlError, AccessControlResult};
use crate::store::{DeletionSummary, EntityStore};
use crate::types::{
    AccessControlConfig, BarrierId, DepartmentId, EntityKind, EventId, SensorId, SensorState, UserId,
};

/// A credential verification request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyAccessRequest {
    /// Presented badge uid; required
    pub uid: Option<String>,
    /// Barrier the badge was presented at
    pub barrier_id: Option<BarrierId>,
}

impl VerifyAccessRequest {
    /// Request for a uid with no target barrier
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: Some(uid.into()), barrier_id: None }
    }

    /// Target a barrier
    pub fn at_barrier(mut self, barrier_id: BarrierId) -> Self {
        self.barrier_id = Some(barrier_id);
        self
    }
}

/// Entry point for every inbound access control request
#[derive(Debug)]
pub struct AccessControlService {
    store: Arc<EntityStore>,
    events: Arc<EventLog>,
    engine: AccessDecisionEngine,
    barriers: BarrierController,
}

impl AccessControlService {
    /// Create a service over an existing store and event log
    pub fn new(store: EntityStore, events: EventLog, lock_timeout: Duration) -> Self {
        let store = Arc::new(store);
        let events = Arc::new(events);
        Self {
            engine: AccessDecisionEngine::new(store.clone(), events.clone(), lock_timeout),
            barriers: BarrierController::new(store.clone(), events.clone(), lock_timeout),
            store,
            events,
        }
    }

    /// Create an empty in-memory service
    pub fn in_memory(lock_timeout: Duration) -> Self {
        Self::new(EntityStore::new(), EventLog::new(), lock_timeout)
    }

    /// Open the service described by `config`
    ///
    /// The entity snapshot is loaded when present and the event journal is
    /// replayed and kept open for appends.
    #[instrument(skip(config), fields(data_dir = %config.data_dir))]
    pub fn open(config: &AccessControlConfig) -> AccessControlResult<Self> {
        let snapshot_path = config.snapshot_path();
        let store = if snapshot_path.exists() {
            EntityStore::load_snapshot(&snapshot_path)?
        } else {
            EntityStore::new()
        };
        let events = EventLog::open_journal(&config.event_journal_path())?;
        info!(
            "Opened access control data: {} sensors, {} barriers, {} events",
            store.sensor_count(),
            store.barrier_count(),
            events.len()
        );
        Ok(Self::new(store, events, config.lock_timeout()))
    }

    /// Write the entity snapshot; events are already durable in the journal
    pub fn save_snapshot(&self, path: &Path) -> AccessControlResult<()> {
        self.store.save_snapshot(path)?;
        info!("Saved entity snapshot to {}", path.display());
        Ok(())
    }

    /// Direct access to the entity store
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Direct access to the event log
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    // ---------------------------------------------------------------- callers

    /// Resolve the acting user for `user_id`
    ///
    /// Unknown and inactive users are unauthenticated.
    pub fn actor_for(&self, user_id: UserId) -> AccessControlResult<Actor> {
        match self.store.get_user(user_id) {
            Ok(user) if user.active => Ok(Actor::from(&user)),
            _ => Err(AccessControlError::Unauthenticated),
        }
    }

    /// Resolve the acting user by username
    pub fn actor_for_username(&self, username: &str) -> AccessControlResult<Actor> {
        match self.store.find_user_by_username(username) {
            Some(user) if user.active => Ok(Actor::from(&user)),
            _ => Err(AccessControlError::Unauthenticated),
        }
    }

    fn authorize(&self, caller: &Caller, operation: Operation) -> AccessControlResult<()> {
        caller.require(operation).map_err(|err| {
            audit_event!(
                warn,
                "Operation refused",
                operation = tracing::field::display(operation),
                caller = tracing::field::debug(caller.actor().map(|a| a.username.as_str())),
                status_code = err.status_code()
            );
            err
        })
    }

    fn require_actor<'a>(&self, caller: &'a Caller, operation: Operation) -> AccessControlResult<&'a Actor> {
        self.authorize(caller, operation)?;
        caller.actor().ok_or(AccessControlError::Unauthenticated)
    }

    // ------------------------------------------------------ access decisions

    /// Evaluate a presented credential
    ///
    /// A missing or blank uid is a validation failure and records nothing.
    pub fn verify_access(&self, caller: &Caller, request: &VerifyAccessRequest) -> AccessControlResult<Decision> {
        self.authorize(caller, Operation::VerifyAccess)?;
        let uid = request
            .uid
            .as_deref()
            .ok_or_else(|| AccessControlError::validation("uid", "uid is required"))?;
        self.engine.evaluate(uid, request.barrier_id)
    }

    /// Open a barrier on behalf of the caller
    pub fn manual_open(&self, caller: &Caller, barrier_id: BarrierId) -> AccessControlResult<Barrier> {
        let actor = self.require_actor(caller, Operation::OpenBarrier)?;
        self.barriers.open(barrier_id, actor)
    }

    /// Close a barrier on behalf of the caller
    pub fn manual_close(&self, caller: &Caller, barrier_id: BarrierId) -> AccessControlResult<Barrier> {
        let actor = self.require_actor(caller, Operation::CloseBarrier)?;
        self.barriers.close(barrier_id, actor)
    }

    // ------------------------------------------------------------------ users

    /// Create a user
    pub fn create_user(&self, caller: &Caller, input: NewUser) -> AccessControlResult<User> {
        self.authorize(caller, Operation::Create(EntityKind::User))?;
        self.store.create_user(input)
    }

    /// Get a user
    pub fn get_user(&self, caller: &Caller, id: UserId) -> AccessControlResult<User> {
        self.authorize(caller, Operation::Read(EntityKind::User))?;
        self.store.get_user(id)
    }

    /// List users
    pub fn list_users(&self, caller: &Caller) -> AccessControlResult<Vec<User>> {
        self.authorize(caller, Operation::Read(EntityKind::User))?;
        Ok(self.store.list_users())
    }

    /// Update a user
    pub fn update_user(&self, caller: &Caller, id: UserId, update: UserUpdate) -> AccessControlResult<User> {
        self.authorize(caller, Operation::Update(EntityKind::User))?;
        self.store.update_user(id, update)
    }

    /// Deactivate a user
    pub fn deactivate_user(&self, caller: &Caller, id: UserId) -> AccessControlResult<User> {
        self.authorize(caller, Operation::Delete(EntityKind::User))?;
        self.store.deactivate_user(id)
    }

    /// Delete a user, unassigning its sensors
    pub fn delete_user(&self, caller: &Caller, id: UserId) -> AccessControlResult<DeletionSummary> {
        self.authorize(caller, Operation::Delete(EntityKind::User))?;
        self.store.delete_user(id)
    }

    // ------------------------------------------------------------ departments

    /// Create a department
    pub fn create_department(&self, caller: &Caller, input: NewDepartment) -> AccessControlResult<Department> {
        self.authorize(caller, Operation::Create(EntityKind::Department))?;
        self.store.create_department(input)
    }

    /// Get a department
    pub fn get_department(&self, caller: &Caller, id: DepartmentId) -> AccessControlResult<Department> {
        self.authorize(caller, Operation::Read(EntityKind::Department))?;
        self.store.get_department(id)
    }

    /// List departments
    pub fn list_departments(&self, caller: &Caller) -> AccessControlResult<Vec<Department>> {
        self.authorize(caller, Operation::Read(EntityKind::Department))?;
        Ok(self.store.list_departments())
    }

    /// Update a department
    pub fn update_department(
        &self,
        caller: &Caller,
        id: DepartmentId,
        update: DepartmentUpdate,
    ) -> AccessControlResult<Department> {
        self.authorize(caller, Operation::Update(EntityKind::Department))?;
        self.store.update_department(id, update)
    }

    /// Deactivate a department
    pub fn deactivate_department(&self, caller: &Caller, id: DepartmentId) -> AccessControlResult<Department> {
        self.authorize(caller, Operation::Delete(EntityKind::Department))?;
        self.store.deactivate_department(id)
    }

    /// Delete a department, its barriers, and its sensor references
    pub fn delete_department(&self, caller: &Caller, id: DepartmentId) -> AccessControlResult<DeletionSummary> {
        self.authorize(caller, Operation::Delete(EntityKind::Department))?;
        self.store.delete_department(id)
    }

    // ---------------------------------------------------------------- sensors

    /// Register a sensor
    pub fn create_sensor(&self, caller: &Caller, input: NewSensor) -> AccessControlResult<Sensor> {
        self.authorize(caller, Operation::Create(EntityKind::Sensor))?;
        self.store.create_sensor(input)
    }

    /// Get a sensor
    pub fn get_sensor(&self, caller: &Caller, id: SensorId) -> AccessControlResult<Sensor> {
        self.authorize(caller, Operation::Read(EntityKind::Sensor))?;
        self.store.get_sensor(id)
    }

    /// List sensors, newest first
    pub fn list_sensors(&self, caller: &Caller) -> AccessControlResult<Vec<Sensor>> {
        self.authorize(caller, Operation::Read(EntityKind::Sensor))?;
        Ok(self.store.list_sensors())
    }

    /// Update a sensor
    pub fn update_sensor(&self, caller: &Caller, id: SensorId, update: SensorUpdate) -> AccessControlResult<Sensor> {
        self.authorize(caller, Operation::Update(EntityKind::Sensor))?;
        self.store.update_sensor(id, update)
    }

    /// Set a sensor ACTIVE
    pub fn activate_sensor(&self, caller: &Caller, id: SensorId) -> AccessControlResult<Sensor> {
        self.authorize(caller, Operation::ActivateSensor)?;
        self.store.set_sensor_state(id, SensorState::Active)
    }

    /// Set a sensor INACTIVE
    pub fn deactivate_sensor(&self, caller: &Caller, id: SensorId) -> AccessControlResult<Sensor> {
        self.authorize(caller, Operation::DeactivateSensor)?;
        self.store.set_sensor_state(id, SensorState::Inactive)
    }

    /// Delete a sensor; events keep referencing its id
    pub fn delete_sensor(&self, caller: &Caller, id: SensorId) -> AccessControlResult<Sensor> {
        self.authorize(caller, Operation::Delete(EntityKind::Sensor))?;
        self.store.delete_sensor(id)
    }

    // --------------------------------------------------------------- barriers

    /// Create a barrier
    pub fn create_barrier(&self, caller: &Caller, input: NewBarrier) -> AccessControlResult<Barrier> {
        self.authorize(caller, Operation::Create(EntityKind::Barrier))?;
        self.store.create_barrier(input)
    }

    /// Get a barrier
    pub fn get_barrier(&self, caller: &Caller, id: BarrierId) -> AccessControlResult<Barrier> {
        self.authorize(caller, Operation::Read(EntityKind::Barrier))?;
        self.store.get_barrier(id)
    }

    /// List barriers
    pub fn list_barriers(&self, caller: &Caller) -> AccessControlResult<Vec<Barrier>> {
        self.authorize(caller, Operation::Read(EntityKind::Barrier))?;
        Ok(self.store.list_barriers())
    }

    /// Update a barrier's name, department, or description
    pub fn update_barrier(&self, caller: &Caller, id: BarrierId, update: BarrierUpdate) -> AccessControlResult<Barrier> {
        self.authorize(caller, Operation::Update(EntityKind::Barrier))?;
        self.store.update_barrier(id, update)
    }

    /// Delete a barrier; events keep referencing its id
    pub fn delete_barrier(&self, caller: &Caller, id: BarrierId) -> AccessControlResult<Barrier> {
        self.authorize(caller, Operation::Delete(EntityKind::Barrier))?;
        self.store.delete_barrier(id)
    }

    // ----------------------------------------------------------------- events

    /// Query the event log, newest first
    pub fn query_events(&self, caller: &Caller, filter: &EventFilter) -> AccessControlResult<Vec<Event>> {
        self.authorize(caller, Operation::QueryEvents)?;
        Ok(self.events.query(filter))
    }

    /// Get one event
    pub fn get_event(&self, caller: &Caller, id: EventId) -> AccessControlResult<Event> {
        self.authorize(caller, Operation::QueryEvents)?;
        self.events.get(id)
    }

    /// Per-type event counts
    pub fn event_statistics(&self, caller: &Caller) -> AccessControlResult<EventStatistics> {
        self.authorize(caller, Operation::QueryEvents)?;
        Ok(self.events.statistics())
    }
}
