//! Snapshot Save/Load Integration Tests

mod common;

use common::{memento, spelling, CandidateMemento, TestStore};
use ledger_store::{Sequence, StoreReader, StoreWriter};
use uuid::Uuid;

#[test]
fn test_snapshot_keeps_its_type() {
    let test = TestStore::new();
    let id = Uuid::new_v4();
    let saved = memento(id, 1, "Dave");

    test.writer().save_snapshot(&saved).expect("Failed to save snapshot");

    let loaded = test
        .reader()
        .load_latest_snapshot_for(&id)
        .expect("Failed to load snapshot")
        .expect("Snapshot should exist");

    assert!(loaded.is::<CandidateMemento>());
    assert_eq!(loaded.downcast_ref::<CandidateMemento>(), Some(&saved));
}

#[test]
fn test_only_the_latest_snapshot_is_loaded() {
    let test = TestStore::new();
    let id = Uuid::new_v4();
    let other = Uuid::new_v4();

    let writer = test.writer();
    writer.save_snapshot(&memento(id, 4, "first")).unwrap();
    writer.save_snapshot(&memento(id, 5, "second")).unwrap();
    writer.save_snapshot(&memento(other, 9, "other")).unwrap();

    let loaded = test
        .reader()
        .load_latest_snapshot_for(&id)
        .unwrap()
        .expect("Snapshot should exist");
    assert_eq!(loaded.sequence(), Sequence::new(5));
    assert_eq!(
        loaded.downcast_ref::<CandidateMemento>().map(|m| m.name.as_str()),
        Some("second")
    );
}

#[test]
fn test_latest_snapshot_is_last_stored_not_highest() {
    let test = TestStore::new();
    let id = Uuid::new_v4();

    let writer = test.writer();
    writer.save_snapshot(&memento(id, 7, "newer sequence")).unwrap();
    writer.save_snapshot(&memento(id, 3, "stored later")).unwrap();

    assert_eq!(
        writer.get_latest_snapshot_sequence_for(&id).unwrap(),
        Some(Sequence::new(3))
    );
}

#[test]
fn test_most_recent_snapshot_sequence_is_found() {
    let test = TestStore::new();
    let id = Uuid::new_v4();

    let writer = test.writer();
    writer.save_snapshot(&memento(id, 4, "a")).unwrap();
    writer.save_snapshot(&memento(id, 5, "b")).unwrap();

    assert_eq!(
        writer.get_latest_snapshot_sequence_for(&id).unwrap(),
        Some(Sequence::new(5))
    );
}

#[test]
fn test_no_snapshot_file() {
    let test = TestStore::new();
    let id = Uuid::new_v4();

    assert!(!test.reader().snapshot_path().exists());
    assert!(test.reader().load_latest_snapshot_for(&id).unwrap().is_none());
    assert_eq!(test.writer().get_latest_snapshot_sequence_for(&id).unwrap(), None);
}

#[test]
fn test_events_since_snapshot_are_counted() {
    let test = TestStore::new();
    let id = Uuid::new_v4();
    let writer = test.writer();

    writer
        .save_events(&[&spelling(id, 1, "a"), &spelling(id, 2, "b")])
        .unwrap();
    assert_eq!(writer.get_number_of_events_since_snapshot_for(&id).unwrap(), 2);

    writer.save_snapshot(&memento(id, 2, "b")).unwrap();
    assert_eq!(writer.get_number_of_events_since_snapshot_for(&id).unwrap(), 0);

    writer
        .save_events(&[&spelling(id, 3, "c"), &spelling(id, 4, "d"), &spelling(id, 5, "e")])
        .unwrap();
    assert_eq!(writer.get_number_of_events_since_snapshot_for(&id).unwrap(), 3);
}

#[test]
fn test_rehydrate_from_snapshot_and_later_events() {
    let test = TestStore::new();
    let id = Uuid::new_v4();
    let writer = test.writer();

    writer
        .save_events(&[&spelling(id, 1, "Dvae"), &spelling(id, 2, "Dave")])
        .unwrap();
    writer.save_snapshot(&memento(id, 2, "Dave")).unwrap();
    writer.save_events(&[&spelling(id, 3, "David")]).unwrap();

    let reader = test.reader();
    let snapshot = reader.load_latest_snapshot_for(&id).unwrap();
    let since = snapshot.as_ref().map(|s| s.sequence());

    let mut name = snapshot
        .as_ref()
        .and_then(|s| s.downcast_ref::<CandidateMemento>())
        .map(|m| m.name.clone())
        .unwrap_or_default();
    for event in reader.load_events_since(&id, since).unwrap() {
        let event = event.unwrap();
        if let Some(fix) = event.downcast_ref::<common::FixNameSpelling>() {
            name = fix.new_name.clone();
        }
    }

    assert_eq!(name, "David");
}
