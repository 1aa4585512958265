//! Badge Access Control
//!
//! The access-decision and state-transition core of an RFID badge access
//! control backend: badges (sensors) assigned to users, departments grouping
//! sensors and barriers, barriers gating physical entry, and an immutable
//! event log recording every access attempt and manual action.
//!
//! # Overview
//!
//! Given a presented badge uid the core decides grant or deny, applies manual
//! barrier commands, and appends one authoritative audit event per decision,
//! under role-based authorization (administrator vs. operator).
//!
//! ## Key Features
//!
//! - **Entity Store**: users, departments, sensors, and barriers with write-time uniqueness and cascade rules
//! - **Authorization Policy**: pure `(role, operation)` decisions
//! - **Access Decision Engine**: one event per evaluated credential, never a barrier actuation
//! - **Barrier Controller**: idempotent open/close with rollback on failed audit writes
//! - **Event Log**: append-only, newest-first queries, optional JSON-lines journal
//! - **Per-entity serialization**: time-bounded locks failing with a retryable busy error
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use badge_access_control::*;
//!
//! let service = AccessControlService::in_memory(Duration::from_millis(250));
//! seed_demo_data(service.store())?;
//!
//! let operator = Caller::from(service.actor_for_username("operator")?);
//! let decision = service.verify_access(&operator, &VerifyAccessRequest::new("RFID-003-CCC"))?;
//! assert_eq!(decision.status_code(), 403);
//! assert_eq!(decision.response().reason.as_deref(), Some("sensor in state INACTIVE"));
//! # Ok::<(), AccessControlError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums, and configuration
//! - [`entities`]: Record types with creation inputs and partial updates
//! - [`store`]: The entity store and its snapshots
//! - [`permissions`]: Operations, callers, and the authorization policy
//! - [`events`]: Audit events, the event log, and journals
//! - [`access`]: Access decision engine and barrier controller
//! - [`service`]: Service facade, errors, logging, locks, and seeding
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌──────────────────────┐    ┌─────────────┐
//! │   Service   │───►│ Access Decision      │───►│  Event Log  │
//! │   facade    │    │ Engine               │    │             │
//! │             │───►│ Barrier Controller   │───►│  Journal    │
//! └─────────────┘    └──────────────────────┘    └─────────────┘
//!        │                      │
//!        ▼                      ▼
//! ┌─────────────┐    ┌──────────────────────┐
//! │ Permissions │    │    Entity Store      │
//! └─────────────┘    └──────────────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod access;
pub mod entities;
pub mod events;
pub mod permissions;
pub mod service;
pub mod store;

pub mod types;

// Core types and identifiers
pub use types::{
    AccessControlConfig,
    BarrierId,
    BarrierState,
    ConfigValidationError,
    DenialReason,
    DepartmentId,
    EntityKind,
    EventId,
    EventType,
    // Enums
    Role,
    SensorId,
    SensorState,
    // Identifiers
    UserId,
};

// Records
pub use entities::{Barrier, Department, NewBarrier, NewDepartment, NewSensor, NewUser, Sensor, User};

// Storage
pub use store::{DeletionSummary, EntityStore};

// Authorization
pub use permissions::{authorize, Actor, Authorization, Caller, Operation, OperationClass};

// Events
pub use events::{Event, EventFilter, EventLog, EventStatistics};

// Decisions and barrier control
pub use access::{AccessDecisionEngine, AccessResponse, BarrierController, Decision, DecisionOutcome, DecisionStatus};

// Service
pub use service::{
    seed_demo_data, AccessControlError, AccessControlResult, AccessControlService, ErrorResponse, SeedReport,
    VerifyAccessRequest,
};
