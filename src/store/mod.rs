//! Entity store
//!
//! Canonical storage for users, departments, sensors, and barriers with
//! write-time uniqueness checks and explicit cascade rules:
//!
//! - deleting a department deletes its barriers and detaches its sensors
//! - deleting a user unassigns its sensors
//! - reads fail only with not-found for an unknown identifier

mod index;
pub mod registry;
pub mod snapshot;

pub use registry::{BarrierStateChange, DeletionSummary, EntityStore};
pub use snapshot::StoreSnapshot;
