//! Access barriers
//!
//! A barrier is a two-state access point owned by exactly one department.
//! Its state only changes through explicit open and close commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::validation::validate_name;
use crate::service::error::AccessControlResult;
use crate::types::{BarrierId, BarrierState, DepartmentId};

/// A physical access barrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barrier {
    /// Unique identifier for the barrier
    pub id: BarrierId,
    /// Unique, human-readable name
    pub name: String,
    /// Current state
    pub state: BarrierState,
    /// Owning department
    pub department_id: DepartmentId,
    /// Free-text description
    pub description: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Barrier {
    /// Whether the barrier is open
    pub fn is_open(&self) -> bool {
        self.state == BarrierState::Open
    }
}

/// Input for creating a barrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBarrier {
    /// Unique name (at least 3 characters)
    pub name: String,
    /// Owning department
    pub department_id: DepartmentId,
    /// Initial state (defaults to CLOSED)
    #[serde(default)]
    pub state: BarrierState,
    /// Free-text description
    #[serde(default)]
    pub description: String,
}

impl NewBarrier {
    /// Create input for a closed barrier in a department
    pub fn new(name: impl Into<String>, department_id: DepartmentId) -> Self {
        Self {
            name: name.into(),
            department_id,
            state: BarrierState::default(),
            description: String::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate field contents
    pub fn validate(&self) -> AccessControlResult<()> {
        validate_name("name", &self.name)
    }

    pub(crate) fn into_barrier(self, now: DateTime<Utc>) -> Barrier {
        Barrier {
            id: BarrierId::new(),
            name: self.name.trim().to_string(),
            state: self.state,
            department_id: self.department_id,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a barrier; `None` leaves a field unchanged
///
/// The barrier state is not part of the update: it changes only through
/// the barrier controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrierUpdate {
    /// New unique name
    pub name: Option<String>,
    /// New owning department
    pub department_id: Option<DepartmentId>,
    /// New description
    pub description: Option<String>,
}

impl BarrierUpdate {
    /// Validate the fields being changed
    pub fn validate(&self) -> AccessControlResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        Ok(())
    }

    pub(crate) fn apply(self, barrier: &mut Barrier, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            barrier.name = name.trim().to_string();
        }
        if let Some(department_id) = self.department_id {
            barrier.department_id = department_id;
        }
        if let Some(description) = self.description {
            barrier.description = description;
        }
        barrier.updated_at = now;
    }
}
