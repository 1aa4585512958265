//! Entity store
//!
//! This module contains the [`EntityStore`], the canonical owner of user,
//! department, sensor, and barrier records. Uniqueness of sensor uids,
//! department and barrier names, and usernames is enforced at write time;
//! every failed write leaves the store unchanged.

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::entities::{
    Barrier, BarrierUpdate, Department, DepartmentUpdate, NewBarrier, NewDepartment, NewSensor,
    NewUser, Sensor, SensorUpdate, User, UserUpdate,
};
use crate::service::error::{AccessControlError, AccessControlResult};
use crate::store::index::UniqueIndex;
use crate::store::snapshot::StoreSnapshot;
use crate::types::{BarrierId, BarrierState, DepartmentId, EntityKind, SensorId, SensorState, UserId};

/// Side effects of a cascading delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionSummary {
    /// Barriers deleted along with their department
    pub barriers_removed: Vec<BarrierId>,
    /// Sensors whose reference to the deleted record was cleared
    pub sensors_detached: Vec<SensorId>,
}

/// Barrier record before and after a state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrierStateChange {
    /// Record as it was before the change
    pub previous: Barrier,
    /// Record as stored after the change
    pub current: Barrier,
}

#[derive(Debug)]
struct StoreState {
    users: HashMap<UserId, User>,
    departments: HashMap<DepartmentId, Department>,
    sensors: HashMap<SensorId, Sensor>,
    barriers: HashMap<BarrierId, Barrier>,
    usernames: UniqueIndex<UserId>,
    department_names: UniqueIndex<DepartmentId>,
    sensor_uids: UniqueIndex<SensorId>,
    barrier_names: UniqueIndex<BarrierId>,
}

impl StoreState {
    fn new() -> Self {
        Self {
            users: HashMap::new(),
            departments: HashMap::new(),
            sensors: HashMap::new(),
            barriers: HashMap::new(),
            usernames: UniqueIndex::new(EntityKind::User, "username"),
            department_names: UniqueIndex::new(EntityKind::Department, "name"),
            sensor_uids: UniqueIndex::new(EntityKind::Sensor, "uid"),
            barrier_names: UniqueIndex::new(EntityKind::Barrier, "name"),
        }
    }

    fn ensure_user(&self, id: UserId) -> AccessControlResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(AccessControlError::not_found(EntityKind::User, id))
        }
    }

    fn ensure_department(&self, id: DepartmentId) -> AccessControlResult<()> {
        if self.departments.contains_key(&id) {
            Ok(())
        } else {
            Err(AccessControlError::not_found(EntityKind::Department, id))
        }
    }

    fn ensure_sensor_references(
        &self,
        department_id: Option<DepartmentId>,
        user_id: Option<UserId>,
    ) -> AccessControlResult<()> {
        if let Some(department_id) = department_id {
            self.ensure_department(department_id)?;
        }
        if let Some(user_id) = user_id {
            self.ensure_user(user_id)?;
        }
        Ok(())
    }

    /// Rebuild every uniqueness index from the record maps
    fn rebuild_indices(&mut self) -> AccessControlResult<()> {
        self.usernames.clear();
        self.department_names.clear();
        self.sensor_uids.clear();
        self.barrier_names.clear();

        for user in self.users.values() {
            self.usernames.try_insert(user.username.clone(), user.id)?;
        }
        for department in self.departments.values() {
            self.department_names.try_insert(department.name.clone(), department.id)?;
        }
        for sensor in self.sensors.values() {
            self.sensor_uids.try_insert(sensor.uid.clone(), sensor.id)?;
        }
        for barrier in self.barriers.values() {
            self.barrier_names.try_insert(barrier.name.clone(), barrier.id)?;
        }
        Ok(())
    }
}

/// Thread-safe repository of access control records
#[derive(Debug)]
pub struct EntityStore {
    state: RwLock<StoreState>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self { state: RwLock::new(StoreState::new()) }
    }

    // ---------------------------------------------------------------- users

    /// Create a user; the username must be unique
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub fn create_user(&self, input: NewUser) -> AccessControlResult<User> {
        input.validate()?;
        let mut state = self.state.write();
        state.usernames.ensure_available(input.username.trim(), None)?;

        let user = input.into_user(Utc::now());
        state.usernames.insert(user.username.clone(), user.id);
        state.users.insert(user.id, user.clone());
        debug!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Get a user by id
    pub fn get_user(&self, id: UserId) -> AccessControlResult<User> {
        self.state
            .read()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AccessControlError::not_found(EntityKind::User, id))
    }

    /// Find a user by username
    pub fn find_user_by_username(&self, username: &str) -> Option<User> {
        let state = self.state.read();
        state.usernames.get(username).and_then(|id| state.users.get(&id).cloned())
    }

    /// All users ordered by username
    pub fn list_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.state.read().users.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    /// Apply a partial update to a user
    #[instrument(skip(self, update))]
    pub fn update_user(&self, id: UserId, update: UserUpdate) -> AccessControlResult<User> {
        update.validate()?;
        let mut state = self.state.write();
        let old_username = match state.users.get(&id) {
            Some(user) => user.username.clone(),
            None => return Err(AccessControlError::not_found(EntityKind::User, id)),
        };
        if let Some(username) = &update.username {
            state.usernames.ensure_available(username.trim(), Some(id))?;
        }

        let StoreState { users, usernames, .. } = &mut *state;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AccessControlError::not_found(EntityKind::User, id))?;
        update.apply(user, Utc::now());
        usernames.rename(&old_username, user.username.clone(), id);
        debug!("Updated user {}", id);
        Ok(user.clone())
    }

    /// Soft-delete a user by clearing its active flag
    pub fn deactivate_user(&self, id: UserId) -> AccessControlResult<User> {
        self.update_user(id, UserUpdate { active: Some(false), ..Default::default() })
    }

    /// Remove a user and clear it from every sensor assigned to it
    #[instrument(skip(self))]
    pub fn delete_user(&self, id: UserId) -> AccessControlResult<DeletionSummary> {
        let mut state = self.state.write();
        let user = state
            .users
            .remove(&id)
            .ok_or_else(|| AccessControlError::not_found(EntityKind::User, id))?;
        state.usernames.remove(&user.username);

        let now = Utc::now();
        let mut summary = DeletionSummary::default();
        for sensor in state.sensors.values_mut().filter(|s| s.user_id == Some(id)) {
            sensor.user_id = None;
            sensor.updated_at = now;
            summary.sensors_detached.push(sensor.id);
        }
        debug!("Deleted user {} ({} sensors unassigned)", user.username, summary.sensors_detached.len());
        Ok(summary)
    }

    // ---------------------------------------------------------- departments

    /// Create a department; the name must be unique
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn create_department(&self, input: NewDepartment) -> AccessControlResult<Department> {
        input.validate()?;
        let mut state = self.state.write();
        state.department_names.ensure_available(input.name.trim(), None)?;

        let department = input.into_department(Utc::now());
        state.department_names.insert(department.name.clone(), department.id);
        state.departments.insert(department.id, department.clone());
        debug!("Created department {} ({})", department.name, department.id);
        Ok(department)
    }

    /// Get a department by id
    pub fn get_department(&self, id: DepartmentId) -> AccessControlResult<Department> {
        self.state
            .read()
            .departments
            .get(&id)
            .cloned()
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Department, id))
    }

    /// Find a department by name
    pub fn find_department_by_name(&self, name: &str) -> Option<Department> {
        let state = self.state.read();
        state.department_names.get(name.trim()).and_then(|id| state.departments.get(&id).cloned())
    }

    /// All departments ordered by name
    pub fn list_departments(&self) -> Vec<Department> {
        let mut departments: Vec<Department> = self.state.read().departments.values().cloned().collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        departments
    }

    /// Apply a partial update to a department
    #[instrument(skip(self, update))]
    pub fn update_department(&self, id: DepartmentId, update: DepartmentUpdate) -> AccessControlResult<Department> {
        update.validate()?;
        let mut state = self.state.write();
        let old_name = match state.departments.get(&id) {
            Some(department) => department.name.clone(),
            None => return Err(AccessControlError::not_found(EntityKind::Department, id)),
        };
        if let Some(name) = &update.name {
            state.department_names.ensure_available(name.trim(), Some(id))?;
        }

        let StoreState { departments, department_names, .. } = &mut *state;
        let department = departments
            .get_mut(&id)
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Department, id))?;
        update.apply(department, Utc::now());
        department_names.rename(&old_name, department.name.clone(), id);
        debug!("Updated department {}", id);
        Ok(department.clone())
    }

    /// Soft-delete a department by clearing its active flag
    pub fn deactivate_department(&self, id: DepartmentId) -> AccessControlResult<Department> {
        self.update_department(id, DepartmentUpdate { active: Some(false), ..Default::default() })
    }

    /// Remove a department
    ///
    /// Barriers owned by the department are deleted; sensors located in it
    /// are detached and kept.
    #[instrument(skip(self))]
    pub fn delete_department(&self, id: DepartmentId) -> AccessControlResult<DeletionSummary> {
        let mut state = self.state.write();
        let department = state
            .departments
            .remove(&id)
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Department, id))?;
        state.department_names.remove(&department.name);

        let mut summary = DeletionSummary::default();
        let owned: Vec<BarrierId> =
            state.barriers.values().filter(|b| b.department_id == id).map(|b| b.id).collect();
        for barrier_id in owned {
            if let Some(barrier) = state.barriers.remove(&barrier_id) {
                state.barrier_names.remove(&barrier.name);
                summary.barriers_removed.push(barrier_id);
            }
        }

        let now = Utc::now();
        for sensor in state.sensors.values_mut().filter(|s| s.department_id == Some(id)) {
            sensor.department_id = None;
            sensor.updated_at = now;
            summary.sensors_detached.push(sensor.id);
        }

        debug!(
            "Deleted department {} ({} barriers removed, {} sensors detached)",
            department.name,
            summary.barriers_removed.len(),
            summary.sensors_detached.len()
        );
        Ok(summary)
    }

    // -------------------------------------------------------------- sensors

    /// Register a sensor; the uid must be unique and references must exist
    #[instrument(skip(self, input), fields(uid = %input.uid))]
    pub fn create_sensor(&self, input: NewSensor) -> AccessControlResult<Sensor> {
        input.validate()?;
        let mut state = self.state.write();
        state.sensor_uids.ensure_available(input.uid.trim(), None)?;
        state.ensure_sensor_references(input.department_id, input.user_id)?;

        let sensor = input.into_sensor(Utc::now());
        state.sensor_uids.insert(sensor.uid.clone(), sensor.id);
        state.sensors.insert(sensor.id, sensor.clone());
        debug!("Created sensor {} ({})", sensor.uid, sensor.id);
        Ok(sensor)
    }

    /// Get a sensor by id
    pub fn get_sensor(&self, id: SensorId) -> AccessControlResult<Sensor> {
        self.state
            .read()
            .sensors
            .get(&id)
            .cloned()
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Sensor, id))
    }

    /// Find a sensor by its credential uid
    pub fn find_sensor_by_uid(&self, uid: &str) -> Option<Sensor> {
        let state = self.state.read();
        state.sensor_uids.get(uid).and_then(|id| state.sensors.get(&id).cloned())
    }

    /// All sensors, newest first
    pub fn list_sensors(&self) -> Vec<Sensor> {
        let mut sensors: Vec<Sensor> = self.state.read().sensors.values().cloned().collect();
        sensors.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.uid.cmp(&b.uid)));
        sensors
    }

    /// Sensors located in a department
    pub fn sensors_in_department(&self, department_id: DepartmentId) -> Vec<Sensor> {
        self.list_sensors()
            .into_iter()
            .filter(|sensor| sensor.department_id == Some(department_id))
            .collect()
    }

    /// Apply a partial update to a sensor
    #[instrument(skip(self, update))]
    pub fn update_sensor(&self, id: SensorId, update: SensorUpdate) -> AccessControlResult<Sensor> {
        update.validate()?;
        let mut state = self.state.write();
        let old_uid = match state.sensors.get(&id) {
            Some(sensor) => sensor.uid.clone(),
            None => return Err(AccessControlError::not_found(EntityKind::Sensor, id)),
        };
        if let Some(uid) = &update.uid {
            state.sensor_uids.ensure_available(uid.trim(), Some(id))?;
        }
        state.ensure_sensor_references(update.department_id.flatten(), update.user_id.flatten())?;

        let StoreState { sensors, sensor_uids, .. } = &mut *state;
        let sensor = sensors
            .get_mut(&id)
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Sensor, id))?;
        update.apply(sensor, Utc::now());
        sensor_uids.rename(&old_uid, sensor.uid.clone(), id);
        debug!("Updated sensor {} (state {})", sensor.uid, sensor.state);
        Ok(sensor.clone())
    }

    /// Set the lifecycle state of a sensor
    pub fn set_sensor_state(&self, id: SensorId, state: SensorState) -> AccessControlResult<Sensor> {
        self.update_sensor(id, SensorUpdate::state(state))
    }

    /// Remove a sensor
    #[instrument(skip(self))]
    pub fn delete_sensor(&self, id: SensorId) -> AccessControlResult<Sensor> {
        let mut state = self.state.write();
        let sensor = state
            .sensors
            .remove(&id)
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Sensor, id))?;
        state.sensor_uids.remove(&sensor.uid);
        debug!("Deleted sensor {}", sensor.uid);
        Ok(sensor)
    }

    // ------------------------------------------------------------- barriers

    /// Create a barrier; the name must be unique and the department must exist
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn create_barrier(&self, input: NewBarrier) -> AccessControlResult<Barrier> {
        input.validate()?;
        let mut state = self.state.write();
        state.barrier_names.ensure_available(input.name.trim(), None)?;
        state.ensure_department(input.department_id)?;

        let barrier = input.into_barrier(Utc::now());
        state.barrier_names.insert(barrier.name.clone(), barrier.id);
        state.barriers.insert(barrier.id, barrier.clone());
        debug!("Created barrier {} ({})", barrier.name, barrier.id);
        Ok(barrier)
    }

    /// Get a barrier by id
    pub fn get_barrier(&self, id: BarrierId) -> AccessControlResult<Barrier> {
        self.state
            .read()
            .barriers
            .get(&id)
            .cloned()
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Barrier, id))
    }

    /// Find a barrier by name
    pub fn find_barrier_by_name(&self, name: &str) -> Option<Barrier> {
        let state = self.state.read();
        state.barrier_names.get(name.trim()).and_then(|id| state.barriers.get(&id).cloned())
    }

    /// All barriers ordered by name
    pub fn list_barriers(&self) -> Vec<Barrier> {
        let mut barriers: Vec<Barrier> = self.state.read().barriers.values().cloned().collect();
        barriers.sort_by(|a, b| a.name.cmp(&b.name));
        barriers
    }

    /// Barriers owned by a department
    pub fn barriers_in_department(&self, department_id: DepartmentId) -> Vec<Barrier> {
        self.list_barriers()
            .into_iter()
            .filter(|barrier| barrier.department_id == department_id)
            .collect()
    }

    /// Apply a partial update to a barrier
    #[instrument(skip(self, update))]
    pub fn update_barrier(&self, id: BarrierId, update: BarrierUpdate) -> AccessControlResult<Barrier> {
        update.validate()?;
        let mut state = self.state.write();
        let old_name = match state.barriers.get(&id) {
            Some(barrier) => barrier.name.clone(),
            None => return Err(AccessControlError::not_found(EntityKind::Barrier, id)),
        };
        if let Some(name) = &update.name {
            state.barrier_names.ensure_available(name.trim(), Some(id))?;
        }
        if let Some(department_id) = update.department_id {
            state.ensure_department(department_id)?;
        }

        let StoreState { barriers, barrier_names, .. } = &mut *state;
        let barrier = barriers
            .get_mut(&id)
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Barrier, id))?;
        update.apply(barrier, Utc::now());
        barrier_names.rename(&old_name, barrier.name.clone(), id);
        debug!("Updated barrier {}", id);
        Ok(barrier.clone())
    }

    /// Set a barrier's state unconditionally, returning the record before and after
    pub fn set_barrier_state(&self, id: BarrierId, target: BarrierState) -> AccessControlResult<BarrierStateChange> {
        let mut state = self.state.write();
        let barrier = state
            .barriers
            .get_mut(&id)
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Barrier, id))?;
        let previous = barrier.clone();
        barrier.state = target;
        barrier.updated_at = Utc::now();
        debug!("Barrier {} {} -> {}", barrier.name, previous.state, target);
        Ok(BarrierStateChange { previous, current: barrier.clone() })
    }

    /// Put back the state captured before a failed state change
    ///
    /// Only the state and modification time are restored. A barrier deleted
    /// in the meantime stays deleted.
    pub fn restore_barrier(&self, previous: Barrier) {
        let mut state = self.state.write();
        if let Some(barrier) = state.barriers.get_mut(&previous.id) {
            debug!("Restoring barrier {} to {}", barrier.name, previous.state);
            barrier.state = previous.state;
            barrier.updated_at = previous.updated_at;
        }
    }

    /// Remove a barrier
    #[instrument(skip(self))]
    pub fn delete_barrier(&self, id: BarrierId) -> AccessControlResult<Barrier> {
        let mut state = self.state.write();
        let barrier = state
            .barriers
            .remove(&id)
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Barrier, id))?;
        state.barrier_names.remove(&barrier.name);
        debug!("Deleted barrier {}", barrier.name);
        Ok(barrier)
    }

    // ------------------------------------------------------------- counting

    /// Number of users
    pub fn user_count(&self) -> usize {
        self.state.read().users.len()
    }

    /// Number of departments
    pub fn department_count(&self) -> usize {
        self.state.read().departments.len()
    }

    /// Number of sensors
    pub fn sensor_count(&self) -> usize {
        self.state.read().sensors.len()
    }

    /// Number of barriers
    pub fn barrier_count(&self) -> usize {
        self.state.read().barriers.len()
    }

    // ------------------------------------------------------------ snapshots

    /// Copy every record into a serializable snapshot
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read();
        let mut snapshot = StoreSnapshot {
            users: state.users.values().cloned().collect(),
            departments: state.departments.values().cloned().collect(),
            sensors: state.sensors.values().cloned().collect(),
            barriers: state.barriers.values().cloned().collect(),
        };
        snapshot.sort();
        snapshot
    }

    /// Build a store from a snapshot, re-checking uniqueness and references
    pub fn from_snapshot(snapshot: StoreSnapshot) -> AccessControlResult<Self> {
        let mut state = StoreState::new();
        state.users = snapshot.users.into_iter().map(|u| (u.id, u)).collect();
        state.departments = snapshot.departments.into_iter().map(|d| (d.id, d)).collect();
        state.sensors = snapshot.sensors.into_iter().map(|s| (s.id, s)).collect();
        state.barriers = snapshot.barriers.into_iter().map(|b| (b.id, b)).collect();
        state.rebuild_indices()?;

        for sensor in state.sensors.values() {
            state.ensure_sensor_references(sensor.department_id, sensor.user_id)?;
        }
        for barrier in state.barriers.values() {
            state.ensure_department(barrier.department_id)?;
        }

        debug!(
            "Loaded store snapshot: {} users, {} departments, {} sensors, {} barriers",
            state.users.len(),
            state.departments.len(),
            state.sensors.len(),
            state.barriers.len()
        );
        Ok(Self { state: RwLock::new(state) })
    }

    /// Write the store to a JSON snapshot file
    pub fn save_snapshot(&self, path: &std::path::Path) -> AccessControlResult<()> {
        self.snapshot().save_to_file(path)
    }

    /// Load a store from a JSON snapshot file
    pub fn load_snapshot(path: &std::path::Path) -> AccessControlResult<Self> {
        Self::from_snapshot(StoreSnapshot::load_from_file(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn store_with_department() -> (EntityStore, Department) {
        let store = EntityStore::new();
        let department = store.create_department(NewDepartment::new("Reception", "Ground floor")).unwrap();
        (store, department)
    }

    #[test]
    fn test_duplicate_uid_rejected_without_write() {
        let store = EntityStore::new();
        store.create_sensor(NewSensor::new("RFID-1", "First card")).unwrap();

        let error = store.create_sensor(NewSensor::new("RFID-1", "Second card")).unwrap_err();
        assert!(matches!(error, AccessControlError::DuplicateKey { field: "uid", .. }));
        assert_eq!(store.sensor_count(), 1);
    }

    #[test]
    fn test_rename_frees_old_name() {
        let (store, department) = store_with_department();
        store
            .update_department(department.id, DepartmentUpdate { name: Some("Lobby".into()), ..Default::default() })
            .unwrap();

        assert!(store.find_department_by_name("Reception").is_none());
        assert!(store.create_department(NewDepartment::new("Reception", "")).is_ok());
    }

    #[test]
    fn test_update_to_taken_name_rejected() {
        let (store, department) = store_with_department();
        store.create_department(NewDepartment::new("Warehouse", "")).unwrap();

        let update = DepartmentUpdate { name: Some("Warehouse".into()), ..Default::default() };
        assert!(store.update_department(department.id, update).is_err());
        assert_eq!(store.get_department(department.id).unwrap().name, "Reception");
    }

    #[test]
    fn test_barrier_requires_department() {
        let store = EntityStore::new();
        let error = store.create_barrier(NewBarrier::new("Gate", DepartmentId::new())).unwrap_err();
        assert!(matches!(error, AccessControlError::NotFound { kind: EntityKind::Department, .. }));
    }

    #[test]
    fn test_delete_user_unassigns_sensors() {
        let store = EntityStore::new();
        let user = store.create_user(NewUser::new("operator", Role::Operator)).unwrap();
        let sensor = store.create_sensor(NewSensor::new("RFID-1", "Card").assigned_to(user.id)).unwrap();

        let summary = store.delete_user(user.id).unwrap();
        assert_eq!(summary.sensors_detached, vec![sensor.id]);
        assert!(store.get_sensor(sensor.id).unwrap().user_id.is_none());
        assert!(store.find_user_by_username("operator").is_none());
    }

    #[test]
    fn test_set_barrier_state_reports_previous() {
        let (store, department) = store_with_department();
        let barrier = store.create_barrier(NewBarrier::new("Gate", department.id)).unwrap();

        let change = store.set_barrier_state(barrier.id, BarrierState::Open).unwrap();
        assert_eq!(change.previous.state, BarrierState::Closed);
        assert_eq!(change.current.state, BarrierState::Open);

        store.restore_barrier(change.previous);
        assert_eq!(store.get_barrier(barrier.id).unwrap().state, BarrierState::Closed);
    }

    #[test]
    fn test_snapshot_rejects_duplicate_names() {
        let (store, department) = store_with_department();
        let mut snapshot = store.snapshot();
        let mut clone = department.clone();
        clone.id = DepartmentId::new();
        snapshot.departments.push(clone);

        assert!(EntityStore::from_snapshot(snapshot).is_err());
    }
}
