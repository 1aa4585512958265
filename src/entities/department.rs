//! Departments (zones)
//!
//! A department groups sensors and barriers under a unique name. Barriers are
//! owned by their department; sensors only reference one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::validation::{validate_max_length, validate_name, MAX_LOCATION_LENGTH};
use crate::service::error::AccessControlResult;
use crate::types::DepartmentId;

/// A department or zone of the facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier for the department
    pub id: DepartmentId,
    /// Unique, human-readable name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Physical location (floor, wing)
    pub location: String,
    /// Inactive departments are kept for reference only
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a department
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartment {
    /// Unique name (at least 3 characters)
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Physical location
    #[serde(default)]
    pub location: String,
}

impl NewDepartment {
    /// Create input with a name and location
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self { name: name.into(), location: location.into(), ..Default::default() }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate field contents
    pub fn validate(&self) -> AccessControlResult<()> {
        validate_name("name", &self.name)?;
        validate_max_length("location", Some(&self.location), MAX_LOCATION_LENGTH)
    }

    pub(crate) fn into_department(self, now: DateTime<Utc>) -> Department {
        Department {
            id: DepartmentId::new(),
            name: self.name.trim().to_string(),
            description: self.description,
            location: self.location,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a department; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentUpdate {
    /// New unique name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New location
    pub location: Option<String>,
    /// New active flag
    pub active: Option<bool>,
}

impl DepartmentUpdate {
    /// Validate the fields being changed
    pub fn validate(&self) -> AccessControlResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        validate_max_length("location", self.location.as_deref(), MAX_LOCATION_LENGTH)
    }

    pub(crate) fn apply(self, department: &mut Department, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            department.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            department.description = description;
        }
        if let Some(location) = self.location {
            department.location = location;
        }
        if let Some(active) = self.active {
            department.active = active;
        }
        department.updated_at = now;
    }
}
