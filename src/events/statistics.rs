//! Event log statistics

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::events::audit_event::Event;
use crate::types::{DenialReason, EventType};

/// Counts over a set of logged events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStatistics {
    /// Total number of events
    pub total_events: usize,
    /// ACCESS_GRANTED events
    pub access_granted: usize,
    /// ACCESS_DENIED events
    pub access_denied: usize,
    /// Denials for an unknown uid
    pub denied_unknown_sensor: usize,
    /// Denials for a sensor that is not ACTIVE
    pub denied_sensor_state: usize,
    /// MANUAL_OPEN events
    pub manual_open: usize,
    /// MANUAL_CLOSE events
    pub manual_close: usize,
}

impl EventStatistics {
    /// Tally a slice of events
    pub fn from_events(events: &[Event]) -> Self {
        let mut stats = Self::default();
        for event in events {
            stats.record(event);
        }
        stats
    }

    /// Count one event
    pub fn record(&mut self, event: &Event) {
        self.total_events += 1;
        match event.event_type {
            EventType::AccessGranted => self.access_granted += 1,
            EventType::AccessDenied => {
                self.access_denied += 1;
                match event.reason {
                    Some(DenialReason::SensorNotFound) => self.denied_unknown_sensor += 1,
                    Some(DenialReason::SensorState(_)) => self.denied_sensor_state += 1,
                    None => {}
                }
            }
            EventType::ManualOpen => self.manual_open += 1,
            EventType::ManualClose => self.manual_close += 1,
        }
    }

    /// Count of events of one type
    pub fn count(&self, event_type: EventType) -> usize {
        match event_type {
            EventType::AccessGranted => self.access_granted,
            EventType::AccessDenied => self.access_denied,
            EventType::ManualOpen => self.manual_open,
            EventType::ManualClose => self.manual_close,
        }
    }

    /// Number of access decisions (granted plus denied)
    pub fn access_decisions(&self) -> usize {
        self.access_granted + self.access_denied
    }

    /// Percentage of access decisions that were grants
    pub fn grant_rate(&self) -> f64 {
        if self.access_decisions() == 0 {
            0.0
        } else {
            (self.access_granted as f64 / self.access_decisions() as f64) * 100.0
        }
    }
}

impl fmt::Display for EventStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Event Log Statistics ===")?;
        writeln!(f, "Total events: {}", self.total_events)?;
        writeln!(f)?;
        writeln!(f, "Access decisions: {}", self.access_decisions())?;
        writeln!(f, "  Granted: {} ({:.1}%)", self.access_granted, self.grant_rate())?;
        writeln!(f, "  Denied: {}", self.access_denied)?;
        writeln!(f, "    Unknown sensor: {}", self.denied_unknown_sensor)?;
        writeln!(f, "    Sensor state: {}", self.denied_sensor_state)?;
        writeln!(f)?;
        writeln!(f, "Manual commands:")?;
        writeln!(f, "  Open: {}", self.manual_open)?;
        write!(f, "  Close: {}", self.manual_close)
    }
}
