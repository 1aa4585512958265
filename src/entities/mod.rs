//! Access control records
//!
//! This module contains the records owned by the entity store: users,
//! departments, sensors (badges), and barriers, together with their creation
//! inputs, partial updates, and field validation.
//!
//! # Usage Example
//!
//! ```rust
//! use badge_access_control::entities::*;
//! use badge_access_control::types::*;
//!
//! let sensor = NewSensor::new("RFID-001-AAA", "Main admin card")
//!     .with_state(SensorState::Active);
//! assert!(sensor.validate().is_ok());
//!
//! let too_short = NewDepartment::new("HQ", "Ground floor");
//! assert!(too_short.validate().is_err());
//! ```

pub mod barrier;
pub mod department;
pub mod sensor;
pub mod user;
pub mod validation;

// Re-export all public types for convenience
pub use barrier::{Barrier, BarrierUpdate, NewBarrier};
pub use department::{Department, DepartmentUpdate, NewDepartment};
pub use sensor::{NewSensor, Sensor, SensorUpdate};
pub use user::{NewUser, User, UserUpdate};
