//! Authorization policy
//!
//! This module decides, per operation and per caller role, whether an action
//! is permitted.
//!
//! # Overview
//!
//! - **Operation**: every action a caller can request, grouped by class
//! - **authorize**: pure `(role, operation) -> allow | deny` decision
//! - **Caller / Actor**: who is asking, anonymous or a resolved user
//!
//! Reads, credential verification, and manual barrier commands are open to
//! any authenticated role; all other mutations require ADMIN.
//!
//! # Usage Example
//!
//! ```rust
//! use badge_access_control::permissions::*;
//! use badge_access_control::types::*;
//!
//! assert!(authorize(Some(Role::Operator), Operation::OpenBarrier).is_allowed());
//! assert!(!authorize(Some(Role::Operator), Operation::Delete(EntityKind::Department)).is_allowed());
//! assert!(!authorize(None, Operation::Read(EntityKind::Sensor)).is_allowed());
//! ```

pub mod caller;
pub mod policy;

// Re-export all public types for convenience
pub use caller::*;
pub use policy::*;
