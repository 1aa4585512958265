//! Core types and identifiers for the access control core
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the system.
//!
//! # Overview
//!
//! - **Identifiers**: UUID-based unique identifiers for every record
//! - **Enums**: Roles, sensor and barrier states, event types, denial reasons
//! - **Configuration**: Service configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use badge_access_control::types::*;
//!
//! let barrier_id = BarrierId::new();
//! assert!(barrier_id.to_string().starts_with("BAR_"));
//!
//! let reason = DenialReason::SensorState(SensorState::Blocked);
//! assert_eq!(reason.to_string(), "sensor in state BLOCKED");
//!
//! let config = AccessControlConfig {
//!     lock_timeout_ms: 500,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
