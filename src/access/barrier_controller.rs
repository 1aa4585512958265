//! Manual barrier commands
//!
//! This module contains the [`BarrierController`], which applies open and
//! close commands issued by an acting user. Commands on the same barrier are
//! serialized; each successful command stores the new state and appends one
//! MANUAL_OPEN or MANUAL_CLOSE event. If the event cannot be appended the
//! state change is undone and the error returned.

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, field, instrument};

use crate::audit_event;
use crate::entities::Barrier;
use crate::events::{EventDraft, EventLog};
use crate::permissions::{authorize, Actor, Operation};
use crate::service::error::AccessControlResult;
use crate::service::locks::EntityLocks;
use crate::store::EntityStore;
use crate::types::{BarrierId, BarrierState};

/// Applies manual open/close commands to barriers
#[derive(Debug)]
pub struct BarrierController {
    store: Arc<EntityStore>,
    events: Arc<EventLog>,
    locks: EntityLocks<BarrierId>,
}

impl BarrierController {
    /// Create a controller, bounding per-barrier lock waits by `lock_timeout`
    pub fn new(store: Arc<EntityStore>, events: Arc<EventLog>, lock_timeout: Duration) -> Self {
        Self { store, events, locks: EntityLocks::new(lock_timeout) }
    }

    /// Open a barrier; opening an open barrier still records an event
    pub fn open(&self, barrier_id: BarrierId, actor: &Actor) -> AccessControlResult<Barrier> {
        self.command(barrier_id, actor, BarrierState::Open)
    }

    /// Close a barrier; closing a closed barrier still records an event
    pub fn close(&self, barrier_id: BarrierId, actor: &Actor) -> AccessControlResult<Barrier> {
        self.command(barrier_id, actor, BarrierState::Closed)
    }

    #[instrument(skip(self, actor), fields(actor = %actor.username))]
    fn command(&self, barrier_id: BarrierId, actor: &Actor, target: BarrierState) -> AccessControlResult<Barrier> {
        let operation = match target {
            BarrierState::Open => Operation::OpenBarrier,
            BarrierState::Closed => Operation::CloseBarrier,
        };
        authorize(Some(actor.role), operation).into_result(operation)?;

        let lock = self.locks.handle(&barrier_id);
        let result = {
            let _guard = lock.acquire(self.locks.timeout(), format_args!("barrier {}", barrier_id))?;
            self.apply(barrier_id, actor, target)
        };
        drop(lock);
        self.locks.forget(&barrier_id);
        result
    }

    fn apply(&self, barrier_id: BarrierId, actor: &Actor, target: BarrierState) -> AccessControlResult<Barrier> {
        let change = self.store.set_barrier_state(barrier_id, target)?;
        let draft = match target {
            BarrierState::Open => EventDraft::manual_open(&change.current, actor),
            BarrierState::Closed => EventDraft::manual_close(&change.current, actor),
        };

        match self.events.append(draft) {
            Ok(event) => {
                audit_event!(
                    info,
                    "Manual barrier command",
                    barrier = change.current.name.as_str(),
                    previous = field::display(change.previous.state),
                    state = field::display(target),
                    actor = actor.username.as_str(),
                    event_seq = event.seq
                );
                Ok(change.current)
            }
            Err(err) => {
                error!("Rolling back barrier {} after failed event append: {}", change.current.name, err);
                self.store.restore_barrier(change.previous);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NewBarrier, NewDepartment};
    use crate::events::{Event, EventJournal};
    use crate::service::error::AccessControlError;
    use crate::types::{EventType, Role, UserId};
    use std::io;

    struct FailingJournal;

    impl EventJournal for FailingJournal {
        fn record(&mut self, _event: &Event) -> io::Result<()> {
            Err(io::Error::other("journal unavailable"))
        }
    }

    fn setup(events: EventLog) -> (BarrierController, Arc<EntityStore>, Arc<EventLog>, Barrier) {
        let store = Arc::new(EntityStore::new());
        let events = Arc::new(events);
        let department = store.create_department(NewDepartment::new("Reception", "")).unwrap();
        let barrier = store.create_barrier(NewBarrier::new("Main Barrier", department.id)).unwrap();
        let controller = BarrierController::new(store.clone(), events.clone(), Duration::from_millis(100));
        (controller, store, events, barrier)
    }

    fn operator() -> Actor {
        Actor::new(UserId::new(), "operator", Role::Operator)
    }

    #[test]
    fn test_open_records_actor() {
        let (controller, _, events, barrier) = setup(EventLog::new());
        let actor = operator();

        let opened = controller.open(barrier.id, &actor).unwrap();
        assert!(opened.is_open());

        let event = events.latest().unwrap();
        assert_eq!(event.event_type, EventType::ManualOpen);
        assert_eq!(event.barrier_id, Some(barrier.id));
        assert_eq!(event.user_id, Some(actor.user_id));
        assert_eq!(event.description, "Manual opening of barrier Main Barrier by operator");
    }

    #[test]
    fn test_repeated_close_is_idempotent() {
        let (controller, _, events, barrier) = setup(EventLog::new());
        let actor = operator();

        controller.close(barrier.id, &actor).unwrap();
        let closed = controller.close(barrier.id, &actor).unwrap();
        assert_eq!(closed.state, BarrierState::Closed);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_unknown_barrier() {
        let (controller, _, events, _) = setup(EventLog::new());
        let error = controller.open(BarrierId::new(), &operator()).unwrap_err();
        assert!(matches!(error, AccessControlError::NotFound { .. }));
        assert!(events.is_empty());
    }

    #[test]
    fn test_failed_append_rolls_back_state() {
        let (controller, store, events, barrier) = setup(EventLog::with_journal(Box::new(FailingJournal)));

        let error = controller.open(barrier.id, &operator()).unwrap_err();
        assert!(matches!(error, AccessControlError::Io(_)));
        assert_eq!(store.get_barrier(barrier.id).unwrap().state, BarrierState::Closed);
        assert!(events.is_empty());
    }
}
