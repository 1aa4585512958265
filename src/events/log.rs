//! Append-only event log
//!
//! This module contains the [`EventLog`], the authoritative ledger of access
//! decisions and manual barrier actions, and the [`EventFilter`] used to
//! query it. Appends are serialized; each event receives the next sequence
//! number and a timestamp strictly later than the previous event's, so
//! ordering by timestamp is stable across reads.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tracing::{debug, error, info, instrument};

use crate::events::audit_event::{Event, EventDraft};
use crate::events::journal::{EventJournal, FileJournal};
use crate::events::statistics::EventStatistics;
use crate::service::error::{AccessControlError, AccessControlResult};
use crate::types::{BarrierId, EntityKind, EventId, EventType, SensorId};

/// Conjunctive filter over logged events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Only events of this type
    pub event_type: Option<EventType>,
    /// Only events referencing this sensor
    pub sensor_id: Option<SensorId>,
    /// Only events referencing this barrier
    pub barrier_id: Option<BarrierId>,
    /// Only events at or after this time
    pub since: Option<DateTime<Utc>>,
    /// Only events at or before this time
    pub until: Option<DateTime<Utc>>,
    /// Return at most this many events (newest first)
    pub limit: Option<usize>,
}

impl EventFilter {
    /// Filter matching every event
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one event type
    pub fn of_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// Restrict to events referencing a sensor
    pub fn for_sensor(mut self, sensor_id: SensorId) -> Self {
        self.sensor_id = Some(sensor_id);
        self
    }

    /// Restrict to events referencing a barrier
    pub fn for_barrier(mut self, barrier_id: BarrierId) -> Self {
        self.barrier_id = Some(barrier_id);
        self
    }

    /// Restrict to events at or after `since`
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Restrict to events at or before `until`
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Cap the number of returned events
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether an event satisfies every set criterion
    pub fn matches(&self, event: &Event) -> bool {
        self.event_type.map_or(true, |t| event.event_type == t)
            && self.sensor_id.map_or(true, |id| event.sensor_id == Some(id))
            && self.barrier_id.map_or(true, |id| event.barrier_id == Some(id))
            && self.since.map_or(true, |since| event.timestamp >= since)
            && self.until.map_or(true, |until| event.timestamp <= until)
    }
}

struct LogState {
    events: Vec<Event>,
    next_seq: u64,
    last_timestamp: Option<DateTime<Utc>>,
    journal: Option<Box<dyn EventJournal>>,
}

impl LogState {
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        }
    }
}

/// Append-only, thread-safe event ledger
pub struct EventLog {
    state: RwLock<LogState>,
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("EventLog")
            .field("events", &state.events.len())
            .field("next_seq", &state.next_seq)
            .field("journaled", &state.journal.is_some())
            .finish()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    /// Create an in-memory log
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None)
    }

    /// Create a log that records every append to `journal` first
    pub fn with_journal(journal: Box<dyn EventJournal>) -> Self {
        Self::from_parts(Vec::new(), Some(journal))
    }

    /// Open a JSON-lines journal, replaying the events already stored in it
    pub fn open_journal(path: &Path) -> AccessControlResult<Self> {
        let mut events = FileJournal::read_events(path)?;
        events.sort_by(|a, b| a.seq.cmp(&b.seq));
        if let Some(pair) = events.windows(2).find(|pair| pair[0].seq == pair[1].seq) {
            return Err(AccessControlError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "journal {} holds events {} and {} with sequence number {}",
                    path.display(),
                    pair[0].id,
                    pair[1].id,
                    pair[1].seq
                ),
            )));
        }
        let journal = FileJournal::open(path)?;
        info!("Replayed {} events from {}", events.len(), path.display());
        Ok(Self::from_parts(events, Some(Box::new(journal))))
    }

    fn from_parts(events: Vec<Event>, journal: Option<Box<dyn EventJournal>>) -> Self {
        let next_seq = events.iter().map(|e| e.seq + 1).max().unwrap_or(0);
        let last_timestamp = events.iter().map(|e| e.timestamp).max();
        Self { state: RwLock::new(LogState { events, next_seq, last_timestamp, journal }) }
    }

    /// Append an event, assigning its id, sequence number, and timestamp
    ///
    /// When a journal is attached the event is written to it before it becomes
    /// visible; a journal failure fails the append and leaves the log unchanged.
    #[instrument(skip(self, draft), fields(event_type = %draft.event_type))]
    pub fn append(&self, draft: EventDraft) -> AccessControlResult<Event> {
        draft.validate()?;
        let mut state = self.state.write();
        let timestamp = state.next_timestamp();
        let event = draft.into_event(EventId::new(), state.next_seq, timestamp);

        if let Some(journal) = state.journal.as_mut() {
            if let Err(err) = journal.record(&event) {
                error!("Failed to journal event {}: {}", event.id, err);
                return Err(AccessControlError::Io(err));
            }
        }

        state.next_seq += 1;
        state.last_timestamp = Some(timestamp);
        state.events.push(event.clone());
        debug!("Appended event #{} {} ({})", event.seq, event.event_type, event.description);
        Ok(event)
    }

    /// Events matching `filter`, newest first
    pub fn query(&self, filter: &EventFilter) -> Vec<Event> {
        let state = self.state.read();
        let matching = state.events.iter().rev().filter(|event| filter.matches(event)).cloned();
        let mut events: Vec<Event> = match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        };
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.seq.cmp(&a.seq)));
        events
    }

    /// Every event, newest first
    pub fn all(&self) -> Vec<Event> {
        self.query(&EventFilter::new())
    }

    /// Get an event by id
    pub fn get(&self, id: EventId) -> AccessControlResult<Event> {
        self.state
            .read()
            .events
            .iter()
            .find(|event| event.id == id)
            .cloned()
            .ok_or_else(|| AccessControlError::not_found(EntityKind::Event, id))
    }

    /// Most recently appended event
    pub fn latest(&self) -> Option<Event> {
        self.state.read().events.last().cloned()
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.state.read().events.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.state.read().events.is_empty()
    }

    /// Counts per event type over the whole log
    pub fn statistics(&self) -> EventStatistics {
        EventStatistics::from_events(&self.state.read().events)
    }
}
