//! Enumeration types for the access control core
//!
//! This module contains the enumerations used throughout the system:
//! user roles, sensor and barrier states, event types, denial reasons, and
//! entity kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a user in the access control system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full CRUD over every record
    Admin,
    /// Read access plus manual barrier commands
    #[default]
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::Operator => write!(f, "OPERATOR"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" | "administrator" => Ok(Role::Admin),
            "operator" => Ok(Role::Operator),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Lifecycle state of an RFID sensor (badge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorState {
    /// Badge may be granted access
    #[default]
    Active,
    /// Badge temporarily disabled
    Inactive,
    /// Badge blocked by an administrator
    Blocked,
    /// Badge reported lost
    Lost,
}

impl SensorState {
    /// Whether a sensor in this state may be granted access
    pub fn allows_access(&self) -> bool {
        matches!(self, SensorState::Active)
    }
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorState::Active => write!(f, "ACTIVE"),
            SensorState::Inactive => write!(f, "INACTIVE"),
            SensorState::Blocked => write!(f, "BLOCKED"),
            SensorState::Lost => write!(f, "LOST"),
        }
    }
}

impl FromStr for SensorState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SensorState::Active),
            "inactive" => Ok(SensorState::Inactive),
            "blocked" => Ok(SensorState::Blocked),
            "lost" => Ok(SensorState::Lost),
            _ => Err(format!("Unknown sensor state: {}", s)),
        }
    }
}

/// Physical state of a barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarrierState {
    /// Barrier is open
    Open,
    /// Barrier is closed
    #[default]
    Closed,
}

impl fmt::Display for BarrierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarrierState::Open => write!(f, "OPEN"),
            BarrierState::Closed => write!(f, "CLOSED"),
        }
    }
}

impl FromStr for BarrierState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(BarrierState::Open),
            "closed" => Ok(BarrierState::Closed),
            _ => Err(format!("Unknown barrier state: {}", s)),
        }
    }
}

/// Types of audit events recorded in the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Badge verification succeeded
    AccessGranted,
    /// Badge verification failed
    AccessDenied,
    /// Barrier opened by an operator or administrator
    ManualOpen,
    /// Barrier closed by an operator or administrator
    ManualClose,
}

impl EventType {
    /// All event types, in declaration order
    pub const ALL: [EventType; 4] = [
        EventType::AccessGranted,
        EventType::AccessDenied,
        EventType::ManualOpen,
        EventType::ManualClose,
    ];

    /// Whether the event records a badge verification decision
    pub fn is_access_decision(&self) -> bool {
        matches!(self, EventType::AccessGranted | EventType::AccessDenied)
    }

    /// Whether the event records a manual barrier command
    pub fn is_manual_command(&self) -> bool {
        matches!(self, EventType::ManualOpen | EventType::ManualClose)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::AccessGranted => write!(f, "ACCESS_GRANTED"),
            EventType::AccessDenied => write!(f, "ACCESS_DENIED"),
            EventType::ManualOpen => write!(f, "MANUAL_OPEN"),
            EventType::ManualClose => write!(f, "MANUAL_CLOSE"),
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "access_granted" | "granted" => Ok(EventType::AccessGranted),
            "access_denied" | "denied" => Ok(EventType::AccessDenied),
            "manual_open" | "open" => Ok(EventType::ManualOpen),
            "manual_close" | "close" => Ok(EventType::ManualClose),
            _ => Err(format!("Unknown event type: {}", s)),
        }
    }
}

/// Reason recorded on an `ACCESS_DENIED` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "state", rename_all = "snake_case")]
pub enum DenialReason {
    /// No sensor is registered under the presented uid
    SensorNotFound,
    /// The sensor exists but is not ACTIVE
    SensorState(SensorState),
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::SensorNotFound => write!(f, "sensor not found"),
            DenialReason::SensorState(state) => write!(f, "sensor in state {}", state),
        }
    }
}

/// Kinds of records held by the entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// User accounts
    User,
    /// Departments or zones
    Department,
    /// RFID sensors
    Sensor,
    /// Access barriers
    Barrier,
    /// Audit events
    Event,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::User => write!(f, "user"),
            EntityKind::Department => write!(f, "department"),
            EntityKind::Sensor => write!(f, "sensor"),
            EntityKind::Barrier => write!(f, "barrier"),
            EntityKind::Event => write!(f, "event"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" | "users" => Ok(EntityKind::User),
            "department" | "departments" | "dept" => Ok(EntityKind::Department),
            "sensor" | "sensors" | "badge" | "badges" => Ok(EntityKind::Sensor),
            "barrier" | "barriers" => Ok(EntityKind::Barrier),
            "event" | "events" => Ok(EntityKind::Event),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}
