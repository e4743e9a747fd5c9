use std::fs;

use chrono::NaiveDate;
use tempfile::tempdir;

use moodbloom_lib::{
    open_store, Backend, JsonFileSlot, ManualClock, NewStudySession, NewSubject, Priority,
    SettingsPatch, Snapshot, SnapshotSlot, SqliteSlot, StoreConfig, StoreError, WellbeingStore,
};

fn clock() -> ManualClock {
    ManualClock::new(NaiveDate::from_ymd_opt(2024, 9, 14).unwrap())
}

fn populate(store: &mut WellbeingStore) {
    let physics = store
        .add_subject(NewSubject {
            name: "Physics".into(),
            color: "#FFF3E0".into(),
            total_hours: 1.5,
            target_hours: 12.0,
        })
        .expect("add subject");
    store
        .add_study_session(NewStudySession {
            subject: physics.id.clone(),
            topic: "Kinematics".into(),
            duration: 50,
            date: NaiveDate::from_ymd_opt(2024, 9, 15).unwrap(),
            completed: false,
            notes: "problems 1-10".into(),
            priority: Priority::High,
        })
        .expect("add session");
    store.add_mood("Energetic", "gym").expect("add mood");
    store
        .add_entry("Tried the new cafe", vec!["text-rose-400".into()], false)
        .expect("add entry");
    store.update_challenge(1, 6).expect("update challenge");
    store
        .update_settings(SettingsPatch {
            name: Some("Sam".into()),
            notifications: Some(false),
            ..Default::default()
        })
        .expect("update settings");
}

#[test]
fn json_file_round_trip_restores_state() {
    let tmp = tempdir().expect("tempdir");
    let slot = JsonFileSlot::in_dir(tmp.path(), "moodbloom-storage");
    let path = slot.path().to_path_buf();

    let mut store = WellbeingStore::open(slot.clone(), clock()).expect("open store");
    populate(&mut store);
    let expected = store.snapshot().clone();
    drop(store);

    assert!(path.exists());
    let raw = fs::read_to_string(&path).expect("read snapshot");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("snapshot is json");
    assert_eq!(json["challenges"]["1"]["progress"], 6);
    assert_eq!(json["challenges"]["1"]["lastUpdated"], "2024-09-14");
    assert_eq!(json["studySessions"][0]["priority"], "high");
    assert_eq!(json["entries"][0]["isDraft"], false);
    assert_eq!(json["settings"]["name"], "Sam");

    let reopened = WellbeingStore::open(slot, clock()).expect("reopen store");
    assert_eq!(reopened.snapshot(), &expected);
    assert_eq!(reopened.points(), 60);
}

#[test]
fn sqlite_round_trip_restores_state() {
    let tmp = tempdir().expect("tempdir");
    let db_path = tmp.path().join("moodbloom.sqlite3");

    let expected = {
        let slot = SqliteSlot::open(db_path.clone(), "moodbloom-storage").expect("open slot");
        let mut store = WellbeingStore::open(slot, clock()).expect("open store");
        populate(&mut store);
        store.snapshot().clone()
    };

    let slot = SqliteSlot::open(db_path, "moodbloom-storage").expect("reopen slot");
    let reopened = WellbeingStore::open(slot, clock()).expect("reopen store");
    assert_eq!(reopened.snapshot(), &expected);
}

#[test]
fn snapshot_serialization_round_trip_is_structurally_equal() {
    let slot = moodbloom_lib::MemorySlot::new();
    let mut store = WellbeingStore::open(slot.clone(), clock()).expect("open store");
    populate(&mut store);

    let payload = slot.payload().expect("payload written");
    let decoded = Snapshot::from_json(&payload).expect("decode");
    assert_eq!(&decoded, store.snapshot());
    assert_eq!(decoded.to_json().expect("encode"), payload);
}

#[test]
fn open_store_uses_configured_backend() {
    let tmp = tempdir().expect("tempdir");

    let json_config = StoreConfig::in_dir(tmp.path());
    {
        let mut store = open_store(&json_config).expect("open json store");
        store.add_mood("Calm", "").expect("add mood");
    }
    assert!(tmp.path().join("moodbloom-storage.json").exists());

    let sqlite_config = StoreConfig {
        backend: Backend::Sqlite,
        ..StoreConfig::in_dir(tmp.path())
    };
    {
        let mut store = open_store(&sqlite_config).expect("open sqlite store");
        assert!(store.mood_history().is_empty());
        store.add_mood("Tired", "").expect("add mood");
    }
    assert!(sqlite_config.snapshot_path().exists());

    let store = open_store(&json_config).expect("reopen json store");
    assert_eq!(store.mood_history()[0].mood, "Calm");
}

#[test]
fn unwritable_location_surfaces_persist_error() {
    let tmp = tempdir().expect("tempdir");
    let blocker = tmp.path().join("not-a-dir");
    fs::write(&blocker, "file in the way").expect("write blocker");

    let slot = JsonFileSlot::in_dir(&blocker, "moodbloom-storage");
    let mut store = WellbeingStore::open(slot, clock()).expect("open store");

    let err = store.add_mood("Stressed", "deadline").unwrap_err();
    assert!(matches!(err, StoreError::Persist(_)));
    assert_eq!(store.mood_history().len(), 1);
    assert!(store.is_dirty());
}

#[test]
fn corrupt_file_is_not_overwritten_on_open() {
    let tmp = tempdir().expect("tempdir");
    let slot = JsonFileSlot::in_dir(tmp.path(), "moodbloom-storage");
    fs::write(slot.path(), "{\"moods\": [").expect("write corrupt");

    let err = WellbeingStore::open(slot.clone(), clock()).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
    assert_eq!(
        slot.load().expect("load").as_deref(),
        Some("{\"moods\": [")
    );
}
