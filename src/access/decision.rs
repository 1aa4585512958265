//! Access decisions and their caller-facing response

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::{Barrier, Sensor};
use crate::events::Event;
use crate::types::DenialReason;

/// Granted or denied, as reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    /// Access granted
    Granted,
    /// Access denied
    Denied,
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionStatus::Granted => write!(f, "granted"),
            DecisionStatus::Denied => write!(f, "denied"),
        }
    }
}

/// Which branch of the evaluation produced the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// ACTIVE sensor
    Granted,
    /// No sensor registered under the uid
    NotFound,
    /// Sensor exists but is not ACTIVE
    Forbidden,
}

impl DecisionOutcome {
    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        match self {
            DecisionOutcome::Granted => 200,
            DecisionOutcome::NotFound => 404,
            DecisionOutcome::Forbidden => 403,
        }
    }

    /// Granted or denied
    pub fn status(&self) -> DecisionStatus {
        match self {
            DecisionOutcome::Granted => DecisionStatus::Granted,
            DecisionOutcome::NotFound | DecisionOutcome::Forbidden => DecisionStatus::Denied,
        }
    }
}

/// Result of evaluating a presented credential, with the event that recorded it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Evaluation branch taken
    pub outcome: DecisionOutcome,
    /// Denial reason, absent on grants
    pub reason: Option<DenialReason>,
    /// Resolved sensor, absent when the uid was unknown
    pub sensor: Option<Sensor>,
    /// Resolved target barrier, present only on grants
    pub barrier: Option<Barrier>,
    /// Event appended for this decision
    pub event: Event,
}

impl Decision {
    /// Granted or denied
    pub fn status(&self) -> DecisionStatus {
        self.outcome.status()
    }

    /// Whether access was granted
    pub fn is_granted(&self) -> bool {
        self.outcome == DecisionOutcome::Granted
    }

    /// HTTP-equivalent status code
    pub fn status_code(&self) -> u16 {
        self.outcome.status_code()
    }

    /// Caller-facing response body
    pub fn response(&self) -> AccessResponse {
        AccessResponse::from(self)
    }
}

/// Response body of a credential verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessResponse {
    /// Granted or denied
    pub status: DecisionStatus,
    /// Denial reason text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Resolved sensor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor: Option<Sensor>,
    /// Resolved target barrier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barrier: Option<Barrier>,
    /// Confirmation message on grants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&Decision> for AccessResponse {
    fn from(decision: &Decision) -> Self {
        Self {
            status: decision.status(),
            reason: decision.reason.map(|reason| reason.to_string()),
            sensor: decision.sensor.clone(),
            barrier: decision.barrier.clone(),
            message: decision.is_granted().then(|| "Access granted".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_status_codes() {
        assert_eq!(DecisionOutcome::Granted.status_code(), 200);
        assert_eq!(DecisionOutcome::NotFound.status_code(), 404);
        assert_eq!(DecisionOutcome::Forbidden.status_code(), 403);
        assert_eq!(DecisionOutcome::Forbidden.status(), DecisionStatus::Denied);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DecisionStatus::Granted).unwrap(), "\"granted\"");
        assert_eq!(DecisionStatus::Denied.to_string(), "denied");
    }
}
