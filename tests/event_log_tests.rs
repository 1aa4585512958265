//! Integration tests for event ordering, filtering, and the durable journal

use badge_access_control::events::{EventDraft, EventJournal, FileJournal};
use badge_access_control::*;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::time::Duration;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> AccessControlConfig {
    AccessControlConfig { data_dir: dir.path().display().to_string(), ..Default::default() }
}

fn admin(service: &AccessControlService) -> Caller {
    Caller::from(service.actor_for_username("admin").unwrap())
}

/// Query results are strictly newest first with unique ids
#[test]
fn test_query_newest_first() {
    let service = AccessControlService::in_memory(Duration::from_millis(250));
    seed_demo_data(service.store()).unwrap();
    let caller = admin(&service);

    for uid in ["RFID-001-AAA", "UNKNOWN", "RFID-003-CCC", "RFID-002-BBB"] {
        service.verify_access(&caller, &VerifyAccessRequest::new(uid)).unwrap();
    }

    let events = service.query_events(&caller, &EventFilter::new()).unwrap();
    assert_eq!(events.len(), 4);
    for pair in events.windows(2) {
        assert!(pair[0].timestamp > pair[1].timestamp);
        assert!(pair[0].seq > pair[1].seq);
        assert_ne!(pair[0].id, pair[1].id);
    }
    assert_eq!(events[3].event_type, EventType::AccessGranted);
    assert!(events[2].description.contains("UNKNOWN"));
    assert_eq!(events[0].event_type, EventType::AccessGranted);
}

/// Sensor, barrier, and type filters combine
#[test]
fn test_combined_filters() {
    let service = AccessControlService::in_memory(Duration::from_millis(250));
    seed_demo_data(service.store()).unwrap();
    let caller = admin(&service);
    let sensor = service.store().find_sensor_by_uid("RFID-001-AAA").unwrap();
    let barrier = service.store().find_barrier_by_name("Main Barrier").unwrap();

    service.verify_access(&caller, &VerifyAccessRequest::new("RFID-001-AAA")).unwrap();
    service
        .verify_access(&caller, &VerifyAccessRequest::new("RFID-001-AAA").at_barrier(barrier.id))
        .unwrap();
    service.manual_open(&caller, barrier.id).unwrap();
    service.verify_access(&caller, &VerifyAccessRequest::new("RFID-003-CCC")).unwrap();

    let for_sensor = service.events().query(&EventFilter::new().for_sensor(sensor.id));
    assert_eq!(for_sensor.len(), 2);

    let for_barrier = service.events().query(&EventFilter::new().for_barrier(barrier.id));
    assert_eq!(for_barrier.len(), 2);

    let granted_at_barrier = service
        .events()
        .query(&EventFilter::new().for_barrier(barrier.id).of_type(EventType::AccessGranted));
    assert_eq!(granted_at_barrier.len(), 1);
    assert_eq!(granted_at_barrier[0].sensor_id, Some(sensor.id));

    let limited = service.events().query(&EventFilter::new().limit(1));
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].event_type, EventType::AccessDenied);
}

/// Time window bounds are inclusive
#[test]
fn test_time_window_filter() {
    let log = EventLog::new();
    let first = log.append(EventDraft::unknown_sensor("A")).unwrap();
    let second = log.append(EventDraft::unknown_sensor("B")).unwrap();
    let third = log.append(EventDraft::unknown_sensor("C")).unwrap();

    let window = log.query(&EventFilter::new().since(second.timestamp).until(third.timestamp));
    assert_eq!(window.iter().map(|e| e.id).collect::<Vec<_>>(), vec![third.id, second.id]);

    let before = log.query(&EventFilter::new().until(first.timestamp));
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].id, first.id);
}

/// Statistics count each decision class
#[test]
fn test_statistics_by_type() {
    let service = AccessControlService::in_memory(Duration::from_millis(250));
    seed_demo_data(service.store()).unwrap();
    let caller = admin(&service);
    let barrier = service.store().find_barrier_by_name("Main Barrier").unwrap();

    service.verify_access(&caller, &VerifyAccessRequest::new("RFID-001-AAA")).unwrap();
    service.verify_access(&caller, &VerifyAccessRequest::new("NOPE")).unwrap();
    service.verify_access(&caller, &VerifyAccessRequest::new("RFID-003-CCC")).unwrap();
    service.manual_open(&caller, barrier.id).unwrap();
    service.manual_close(&caller, barrier.id).unwrap();

    let stats = service.event_statistics(&caller).unwrap();
    assert_eq!(stats.total_events, 5);
    assert_eq!(stats.access_granted, 1);
    assert_eq!(stats.access_denied, 2);
    assert_eq!(stats.denied_unknown_sensor, 1);
    assert_eq!(stats.denied_sensor_state, 1);
    assert_eq!(stats.manual_open, 1);
    assert_eq!(stats.manual_close, 1);
    assert_eq!(stats.access_decisions(), 3);
    assert!(stats.to_string().contains("Event Log Statistics"));
}

/// Unknown event id is not found
#[test]
fn test_get_unknown_event() {
    let log = EventLog::new();
    let error = log.get(EventId::new()).unwrap_err();
    assert_eq!(error.status_code(), 404);
}

/// Events written through the journal survive a reopen in order
#[test]
fn test_journal_replay_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");

    let written = {
        let log = EventLog::open_journal(&path).unwrap();
        vec![
            log.append(EventDraft::unknown_sensor("RFID-X")).unwrap(),
            log.append(EventDraft::unknown_sensor("RFID-Y")).unwrap(),
        ]
    };

    let on_disk = FileJournal::read_events(&path).unwrap();
    assert_eq!(on_disk, written);

    let reopened = EventLog::open_journal(&path).unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get(written[0].id).unwrap(), written[0]);

    let next = reopened.append(EventDraft::unknown_sensor("RFID-Z")).unwrap();
    assert_eq!(next.seq, written[1].seq + 1);
    assert!(next.timestamp > written[1].timestamp);
    assert_eq!(FileJournal::read_events(&path).unwrap().len(), 3);
}

/// A record cut short by a crash is dropped and later appends start on a clean line
#[test]
fn test_reopen_after_torn_last_record() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let granted = {
        let service = AccessControlService::open(&config).unwrap();
        seed_demo_data(service.store()).unwrap();
        service.save_snapshot(&config.snapshot_path()).unwrap();
        let caller = admin(&service);
        service.verify_access(&caller, &VerifyAccessRequest::new("RFID-001-AAA")).unwrap().event
    };

    let journal_path = config.event_journal_path();
    let mut file = OpenOptions::new().append(true).open(&journal_path).unwrap();
    file.write_all(br#"{"id":"EVT_"#).unwrap();
    drop(file);

    let service = AccessControlService::open(&config).unwrap();
    assert_eq!(service.events().all(), vec![granted.clone()]);

    let caller = admin(&service);
    let next = service.verify_access(&caller, &VerifyAccessRequest::new("UNKNOWN")).unwrap().event;
    assert_eq!(next.seq, granted.seq + 1);

    let contents = fs::read_to_string(&journal_path).unwrap();
    assert!(contents.ends_with('\n'));
    assert_eq!(contents.lines().count(), 2);
    assert_eq!(FileJournal::read_events(&journal_path).unwrap(), vec![granted, next]);
}

/// A damaged record before the last line refuses the whole journal
#[test]
fn test_corrupt_record_in_the_middle_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let log = EventLog::open_journal(&path).unwrap();
        log.append(EventDraft::unknown_sensor("RFID-X")).unwrap();
    }
    let contents = fs::read_to_string(&path).unwrap();
    fs::write(&path, format!("{{\"id\":\"EVT_\n{}", contents)).unwrap();

    assert!(EventLog::open_journal(&path).is_err());
}

/// Two stored events with one sequence number are refused on replay
#[test]
fn test_duplicate_sequence_number_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.jsonl");

    let event = EventLog::new().append(EventDraft::unknown_sensor("RFID-X")).unwrap();
    let mut copy = event.clone();
    copy.id = EventId::new();

    let mut journal = FileJournal::open(&path).unwrap();
    journal.record(&event).unwrap();
    journal.record(&copy).unwrap();
    drop(journal);

    let error = EventLog::open_journal(&path).unwrap_err();
    assert!(matches!(error, AccessControlError::Io(_)));
    assert!(error.to_string().contains("sequence number"));
    assert!(!error.is_retryable());
}

/// A missing journal file opens as an empty log
#[test]
fn test_missing_journal_is_empty() {
    let dir = TempDir::new().unwrap();
    let log = EventLog::open_journal(&dir.path().join("nested").join("events.jsonl")).unwrap();
    assert!(log.is_empty());
}

/// Service data survives a restart through snapshot and journal
#[test]
fn test_service_restart_keeps_entities_and_events() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let decision_id = {
        let service = AccessControlService::open(&config).unwrap();
        seed_demo_data(service.store()).unwrap();
        let caller = admin(&service);
        let decision = service.verify_access(&caller, &VerifyAccessRequest::new("RFID-002-BBB")).unwrap();
        service.save_snapshot(&config.snapshot_path()).unwrap();
        decision.event.id
    };

    let service = AccessControlService::open(&config).unwrap();
    assert_eq!(service.store().sensor_count(), 3);
    assert_eq!(service.events().len(), 1);
    let event = service.events().get(decision_id).unwrap();
    assert_eq!(event.event_type, EventType::AccessGranted);
    assert_eq!(event.sensor_id, service.store().find_sensor_by_uid("RFID-002-BBB").map(|s| s.id));
}
