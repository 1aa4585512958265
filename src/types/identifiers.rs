//! Unique identifier types for the access control core
//!
//! This module contains UUID-based identifier types for users, departments,
//! sensors, barriers, and events. Identifiers are assigned once by the entity
//! store or event log and never change afterwards.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a prefixed UUID identifier with display, parsing, and serde support.
///
/// Identifiers serialize as `PREFIX_<32 hex chars>`; raw UUIDs are accepted on input.
macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Prefix used in the textual form of this identifier
            pub const PREFIX: &'static str = $prefix;

            /// Create a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0.simple())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .strip_prefix($prefix)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .unwrap_or(s);
                Uuid::parse_str(raw)
                    .map($name)
                    .map_err(|e| format!("Invalid {} '{}': {}", stringify!($name), s, e))
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

prefixed_id!(
    /// Unique identifier for a user (administrator or operator)
    UserId,
    "USER"
);

prefixed_id!(
    /// Unique identifier for a department or zone
    DepartmentId,
    "DEPT"
);

prefixed_id!(
    /// Unique identifier for an RFID sensor record (not the badge uid)
    SensorId,
    "SNS"
);

prefixed_id!(
    /// Unique identifier for an access barrier
    BarrierId,
    "BAR"
);

prefixed_id!(
    /// Unique identifier for an audit event
    EventId,
    "EVT"
);
