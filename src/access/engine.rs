//! Access decision engine
//!
//! Evaluates a presented badge uid against the entity store and appends
//! exactly one event per evaluation:
//!
//! 1. unknown uid: denied (not found), the event carries no sensor reference
//! 2. sensor not ACTIVE: denied (forbidden), the event references the sensor
//! 3. otherwise granted; a resolvable target barrier is recorded on the event
//!
//! A grant never changes the barrier's state. Evaluations of the same uid are
//! serialized, and once the uid resolves the evaluation also holds the lock
//! of the sensor itself, so the log holds a total order per sensor even while
//! its uid is being changed.

use std::sync::Arc;
use std::time::Duration;
use tracing::{field, instrument};

use crate::access::decision::{Decision, DecisionOutcome};
use crate::audit_event;
use crate::entities::Sensor;
use crate::events::{EventDraft, EventLog};
use crate::service::error::{AccessControlError, AccessControlResult};
use crate::service::locks::EntityLocks;
use crate::store::EntityStore;
use crate::types::{BarrierId, DenialReason, SensorId};

/// Evaluates credentials and records the decisions
#[derive(Debug)]
pub struct AccessDecisionEngine {
    store: Arc<EntityStore>,
    events: Arc<EventLog>,
    uid_locks: EntityLocks<String>,
    sensor_locks: EntityLocks<SensorId>,
}

impl AccessDecisionEngine {
    /// Create an engine over a store and log, bounding per-uid lock waits by `lock_timeout`
    pub fn new(store: Arc<EntityStore>, events: Arc<EventLog>, lock_timeout: Duration) -> Self {
        Self {
            store,
            events,
            uid_locks: EntityLocks::new(lock_timeout),
            sensor_locks: EntityLocks::new(lock_timeout),
        }
    }

    /// Evaluate a presented uid, optionally at a target barrier
    ///
    /// A blank uid fails validation without appending an event. Every other
    /// evaluation appends one event before returning; if the append fails the
    /// error is returned instead of a decision.
    #[instrument(skip(self))]
    pub fn evaluate(&self, uid: &str, target_barrier: Option<BarrierId>) -> AccessControlResult<Decision> {
        let uid = uid.trim();
        if uid.is_empty() {
            return Err(AccessControlError::validation("uid", "uid is required"));
        }

        let key = uid.to_string();
        let lock = self.uid_locks.handle(&key);
        let result = {
            let _guard = lock.acquire(self.uid_locks.timeout(), format_args!("sensor {}", uid))?;
            self.resolve(uid, target_barrier)
        };
        drop(lock);
        self.uid_locks.forget(&key);
        result
    }

    /// Look the uid up and decide under the lock of the sensor it names
    fn resolve(&self, uid: &str, target_barrier: Option<BarrierId>) -> AccessControlResult<Decision> {
        let Some(found) = self.store.find_sensor_by_uid(uid) else {
            return self.deny_unknown(uid);
        };

        let lock = self.sensor_locks.handle(&found.id);
        let result = {
            let _guard = lock.acquire(self.sensor_locks.timeout(), format_args!("sensor {}", found.id))?;
            // The sensor may have changed since the lookup.
            match self.store.get_sensor(found.id) {
                Ok(sensor) if sensor.uid == uid => self.decide(uid, sensor, target_barrier),
                _ => self.deny_unknown(uid),
            }
        };
        drop(lock);
        self.sensor_locks.forget(&found.id);
        result
    }

    fn deny_unknown(&self, uid: &str) -> AccessControlResult<Decision> {
        let event = self.events.append(EventDraft::unknown_sensor(uid))?;
        audit_event!(warn, "Access denied: unknown sensor", uid = uid, event_seq = event.seq);
        Ok(Decision {
            outcome: DecisionOutcome::NotFound,
            reason: Some(DenialReason::SensorNotFound),
            sensor: None,
            barrier: None,
            event,
        })
    }

    fn decide(&self, uid: &str, sensor: Sensor, target_barrier: Option<BarrierId>) -> AccessControlResult<Decision> {
        if !sensor.is_active() {
            let event = self.events.append(EventDraft::sensor_not_active(&sensor))?;
            audit_event!(
                warn,
                "Access denied: sensor not active",
                uid = uid,
                state = field::display(sensor.state),
                event_seq = event.seq
            );
            return Ok(Decision {
                outcome: DecisionOutcome::Forbidden,
                reason: Some(DenialReason::SensorState(sensor.state)),
                sensor: Some(sensor),
                barrier: None,
                event,
            });
        }

        let barrier = target_barrier.and_then(|id| self.store.get_barrier(id).ok());
        let event = self.events.append(EventDraft::access_granted(&sensor, barrier.as_ref()))?;
        audit_event!(
            info,
            "Access granted",
            uid = uid,
            barrier = field::debug(barrier.as_ref().map(|b| b.name.as_str())),
            event_seq = event.seq
        );
        Ok(Decision {
            outcome: DecisionOutcome::Granted,
            reason: None,
            sensor: Some(sensor),
            barrier,
            event,
        })
    }
}
