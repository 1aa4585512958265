//! RFID sensors (badges)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::validation::{validate_name, validate_uid};
use crate::service::error::AccessControlResult;
use crate::types::{DepartmentId, SensorId, SensorState, UserId};

/// An RFID badge or key fob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    /// Unique identifier for the sensor record
    pub id: SensorId,
    /// Globally unique credential identifier read from the badge
    pub uid: String,
    /// Human-readable name
    pub name: String,
    /// Lifecycle state; only ACTIVE badges are granted access
    pub state: SensorState,
    /// Department the badge belongs to, if any
    pub department_id: Option<DepartmentId>,
    /// User the badge is assigned to, if any
    pub user_id: Option<UserId>,
    /// Free-text description
    pub description: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Sensor {
    /// Whether the badge may be granted access
    pub fn is_active(&self) -> bool {
        self.state.allows_access()
    }
}

/// Input for registering a sensor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSensor {
    /// Unique credential identifier
    pub uid: String,
    /// Human-readable name (at least 3 characters)
    pub name: String,
    /// Initial state (defaults to ACTIVE)
    #[serde(default)]
    pub state: SensorState,
    /// Department reference
    pub department_id: Option<DepartmentId>,
    /// Assigned user reference
    pub user_id: Option<UserId>,
    /// Free-text description
    #[serde(default)]
    pub description: String,
}

impl NewSensor {
    /// Create input for an ACTIVE, unassigned sensor
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self { uid: uid.into(), name: name.into(), ..Default::default() }
    }

    /// Set the initial state
    pub fn with_state(mut self, state: SensorState) -> Self {
        self.state = state;
        self
    }

    /// Place the sensor in a department
    pub fn in_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Assign the sensor to a user
    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate field contents
    pub fn validate(&self) -> AccessControlResult<()> {
        validate_uid(&self.uid)?;
        validate_name("name", &self.name)
    }

    pub(crate) fn into_sensor(self, now: DateTime<Utc>) -> Sensor {
        Sensor {
            id: SensorId::new(),
            uid: self.uid.trim().to_string(),
            name: self.name.trim().to_string(),
            state: self.state,
            department_id: self.department_id,
            user_id: self.user_id,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a sensor; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorUpdate {
    /// New credential identifier
    pub uid: Option<String>,
    /// New name
    pub name: Option<String>,
    /// New state
    pub state: Option<SensorState>,
    /// New department (`Some(None)` detaches)
    pub department_id: Option<Option<DepartmentId>>,
    /// New assigned user (`Some(None)` unassigns)
    pub user_id: Option<Option<UserId>>,
    /// New description
    pub description: Option<String>,
}

impl SensorUpdate {
    /// Update that only changes the state
    pub fn state(state: SensorState) -> Self {
        Self { state: Some(state), ..Default::default() }
    }

    /// Validate the fields being changed
    pub fn validate(&self) -> AccessControlResult<()> {
        if let Some(uid) = &self.uid {
            validate_uid(uid)?;
        }
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        Ok(())
    }

    pub(crate) fn apply(self, sensor: &mut Sensor, now: DateTime<Utc>) {
        if let Some(uid) = self.uid {
            sensor.uid = uid.trim().to_string();
        }
        if let Some(name) = self.name {
            sensor.name = name.trim().to_string();
        }
        if let Some(state) = self.state {
            sensor.state = state;
        }
        if let Some(department_id) = self.department_id {
            sensor.department_id = department_id;
        }
        if let Some(user_id) = self.user_id {
            sensor.user_id = user_id;
        }
        if let Some(description) = self.description {
            sensor.description = description;
        }
        sensor.updated_at = now;
    }
}
