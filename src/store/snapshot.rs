//! JSON snapshots of the entity store

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::entities::{Barrier, Department, Sensor, User};
use crate::service::error::AccessControlResult;

/// Serializable copy of every record in the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// User records
    #[serde(default)]
    pub users: Vec<User>,
    /// Department records
    #[serde(default)]
    pub departments: Vec<Department>,
    /// Sensor records
    #[serde(default)]
    pub sensors: Vec<Sensor>,
    /// Barrier records
    #[serde(default)]
    pub barriers: Vec<Barrier>,
}

impl StoreSnapshot {
    /// Order records by identifier so repeated saves produce identical files
    pub fn sort(&mut self) {
        self.users.sort_by_key(|u| u.id);
        self.departments.sort_by_key(|d| d.id);
        self.sensors.sort_by_key(|s| s.id);
        self.barriers.sort_by_key(|b| b.id);
    }

    /// Write the snapshot as pretty-printed JSON, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> AccessControlResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a snapshot written by [`Self::save_to_file`]
    pub fn load_from_file(path: &Path) -> AccessControlResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Total number of records
    pub fn record_count(&self) -> usize {
        self.users.len() + self.departments.len() + self.sensors.len() + self.barriers.len()
    }
}
