//! Access decisions and barrier control
//!
//! This module contains the two components that evaluate entity state and
//! append audit events:
//!
//! - **AccessDecisionEngine**: grants or denies a presented badge uid
//! - **BarrierController**: applies manual open/close commands
//!
//! # Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use badge_access_control::access::*;
//! use badge_access_control::entities::NewSensor;
//! use badge_access_control::events::EventLog;
//! use badge_access_control::store::EntityStore;
//!
//! let store = Arc::new(EntityStore::new());
//! let events = Arc::new(EventLog::new());
//! store.create_sensor(NewSensor::new("RFID-001-AAA", "Admin card")).unwrap();
//!
//! let engine = AccessDecisionEngine::new(store, events.clone(), Duration::from_millis(250));
//! let decision = engine.evaluate("RFID-001-AAA", None).unwrap();
//! assert_eq!(decision.status(), DecisionStatus::Granted);
//! assert_eq!(events.len(), 1);
//! ```

pub mod barrier_controller;
pub mod decision;
pub mod engine;

// Re-export all public types for convenience
pub use barrier_controller::*;
pub use decision::*;
pub use engine::*;
