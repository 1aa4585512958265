//! Event log
//!
//! This module contains the audit trail of the system: every access decision
//! and every manual barrier command appends exactly one immutable event.
//!
//! # Overview
//!
//! - **Event / EventDraft**: the appended record and its pre-append contents
//! - **EventLog**: append-only ledger with filtered, newest-first queries
//! - **EventJournal**: durable destination written before an event is visible
//! - **EventStatistics**: per-type counts over the log
//!
//! # Usage Example
//!
//! ```rust
//! use badge_access_control::events::*;
//! use badge_access_control::types::*;
//!
//! let log = EventLog::new();
//! let event = log.append(EventDraft::unknown_sensor("UNKNOWN")).unwrap();
//! assert_eq!(event.event_type, EventType::AccessDenied);
//!
//! let denied = log.query(&EventFilter::new().of_type(EventType::AccessDenied));
//! assert_eq!(denied, vec![event]);
//! ```

pub mod audit_event;
pub mod journal;
pub mod log;
pub mod statistics;

// Re-export all public types for convenience
pub use audit_event::*;
pub use journal::*;
pub use log::*;
pub use statistics::*;
