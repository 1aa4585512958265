//! Audit events
//!
//! This module contains the immutable [`Event`] record and the
//! [`EventDraft`] handed to the event log, which assigns the identifier,
//! sequence number, and timestamp on append.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Barrier, Sensor};
use crate::permissions::Actor;
use crate::service::error::{AccessControlError, AccessControlResult};
use crate::types::{BarrierId, DenialReason, EventId, EventType, SensorId, UserId};

/// An appended audit record; never modified or removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier assigned by the log
    pub id: EventId,
    /// Position in the log, strictly increasing
    pub seq: u64,
    /// Kind of decision or action recorded
    pub event_type: EventType,
    /// Sensor involved, if it was resolved
    pub sensor_id: Option<SensorId>,
    /// Barrier involved, if any
    pub barrier_id: Option<BarrierId>,
    /// User responsible for a manual action
    pub user_id: Option<UserId>,
    /// Present only on ACCESS_DENIED events
    pub reason: Option<DenialReason>,
    /// Free-text description
    pub description: String,
    /// Server-assigned creation time, strictly increasing with `seq`
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Denial reason rendered as text
    pub fn reason_text(&self) -> Option<String> {
        self.reason.map(|reason| reason.to_string())
    }
}

/// Event contents before the log assigns id, sequence, and timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    /// Kind of decision or action recorded
    pub event_type: EventType,
    /// Sensor involved
    pub sensor_id: Option<SensorId>,
    /// Barrier involved
    pub barrier_id: Option<BarrierId>,
    /// Responsible user
    pub user_id: Option<UserId>,
    /// Denial reason
    pub reason: Option<DenialReason>,
    /// Free-text description
    pub description: String,
}

impl EventDraft {
    /// A presented uid matched no sensor
    pub fn unknown_sensor(uid: &str) -> Self {
        Self {
            event_type: EventType::AccessDenied,
            sensor_id: None,
            barrier_id: None,
            user_id: None,
            reason: Some(DenialReason::SensorNotFound),
            description: format!("Access attempt with uid {}", uid),
        }
    }

    /// A sensor that is not ACTIVE attempted access
    pub fn sensor_not_active(sensor: &Sensor) -> Self {
        Self {
            event_type: EventType::AccessDenied,
            sensor_id: Some(sensor.id),
            barrier_id: None,
            user_id: None,
            reason: Some(DenialReason::SensorState(sensor.state)),
            description: format!("Sensor {} attempted access", sensor.name),
        }
    }

    /// Access was granted, optionally at a resolved barrier
    pub fn access_granted(sensor: &Sensor, barrier: Option<&Barrier>) -> Self {
        let description = match barrier {
            Some(barrier) => format!("Access granted for sensor {} at barrier {}", sensor.name, barrier.name),
            None => format!("Access granted for sensor {}", sensor.name),
        };
        Self {
            event_type: EventType::AccessGranted,
            sensor_id: Some(sensor.id),
            barrier_id: barrier.map(|b| b.id),
            user_id: None,
            reason: None,
            description,
        }
    }

    /// A barrier was opened by hand
    pub fn manual_open(barrier: &Barrier, actor: &Actor) -> Self {
        Self::manual(EventType::ManualOpen, barrier, actor)
    }

    /// A barrier was closed by hand
    pub fn manual_close(barrier: &Barrier, actor: &Actor) -> Self {
        Self::manual(EventType::ManualClose, barrier, actor)
    }

    fn manual(event_type: EventType, barrier: &Barrier, actor: &Actor) -> Self {
        let action = match event_type {
            EventType::ManualClose => "closing",
            _ => "opening",
        };
        Self {
            event_type,
            sensor_id: None,
            barrier_id: Some(barrier.id),
            user_id: Some(actor.user_id),
            reason: None,
            description: format!("Manual {} of barrier {} by {}", action, barrier.name, actor.username),
        }
    }

    /// Check that the optional fields match the event type
    pub fn validate(&self) -> AccessControlResult<()> {
        match (self.event_type, self.reason) {
            (EventType::AccessDenied, None) => {
                return Err(AccessControlError::validation("reason", "ACCESS_DENIED events require a denial reason"));
            }
            (EventType::AccessDenied, Some(_)) => {}
            (other, Some(_)) => {
                return Err(AccessControlError::validation(
                    "reason",
                    format!("{} events cannot carry a denial reason", other),
                ));
            }
            (_, None) => {}
        }

        if self.event_type.is_manual_command() {
            if self.barrier_id.is_none() {
                return Err(AccessControlError::validation("barrier_id", "manual commands must reference a barrier"));
            }
            if self.user_id.is_none() {
                return Err(AccessControlError::validation("user_id", "manual commands must reference the actor"));
            }
        }
        Ok(())
    }

    pub(crate) fn into_event(self, id: EventId, seq: u64, timestamp: DateTime<Utc>) -> Event {
        Event {
            id,
            seq,
            event_type: self.event_type,
            sensor_id: self.sensor_id,
            barrier_id: self.barrier_id,
            user_id: self.user_id,
            reason: self.reason,
            description: self.description,
            timestamp,
        }
    }
}
