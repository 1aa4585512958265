//! Service layer
//!
//! This module ties the core components together behind the
//! [`AccessControlService`] facade and carries the cross-cutting pieces:
//! error taxonomy and retry, structured logging, per-entity locks, and demo
//! data seeding.

pub mod access_service;
pub mod error;
pub mod locks;
pub mod logging;
pub mod seed;

// Re-export commonly used types
pub use access_service::{AccessControlService, VerifyAccessRequest};
pub use error::{with_retry, AccessControlError, AccessControlResult, ErrorResponse, RetryPolicy};
pub use locks::{EntityLock, EntityLocks};
pub use logging::{LogFormat, LoggingConfig, LoggingGuards, LoggingResult};
pub use seed::{seed_demo_data, SeedReport};
