use omnivault_core::db::{open_db, open_db_in_memory};
use omnivault_core::kv::KeyValueStore;
use omnivault_core::model::vault::{WELCOME_NOTE_ID, WELCOME_NOTE_TITLE};
use omnivault_core::store::KeyNamespace;
use omnivault_core::{
    CoreConfig, FixedClock, GoalKind, KvError, MemoryKeyValueStore, RecordState,
    SqliteKeyValueStore, StoreError, VaultData, VaultFile, VaultStore,
};

const NOW_MS: i64 = 1_792_200_000_000;

fn populated_vault() -> VaultData {
    let mut vault = VaultData::seeded(NOW_MS);
    vault.add_task("t1", "Review perimeter", NOW_MS).unwrap();
    vault.add_habit("h1", "Run").unwrap();
    vault
        .add_goal("g1", "Ship release", GoalKind::Weekly, NOW_MS)
        .unwrap();
    vault.toggle_goal("g1").unwrap();
    vault.add_file(VaultFile::from_bytes(
        "f1",
        "map.png",
        "image/png",
        &[0x89, 0x50, 0x4e, 0x47],
        NOW_MS,
    ));
    vault.attach_file(WELCOME_NOTE_ID, "f1").unwrap();
    vault.add_voice_note("v1", None, "data:audio/webm;base64,AAAA", 2.5, NOW_MS);
    vault
}

#[test]
fn unseen_identity_loads_seeded_vault() {
    let kv = MemoryKeyValueStore::new();
    let store = VaultStore::with_clock(&kv, FixedClock::at(NOW_MS));

    let vault = store.load("never-seen");

    assert!(vault.tasks.is_empty());
    assert!(vault.habits.is_empty());
    assert!(vault.goals.is_empty());
    assert!(vault.files.is_empty());
    assert!(vault.voice_notes.is_empty());
    assert_eq!(vault.points, 0);
    assert_eq!(vault.notes.len(), 1);
    assert_eq!(vault.notes[0].id, WELCOME_NOTE_ID);
    assert_eq!(vault.notes[0].title, WELCOME_NOTE_TITLE);
    assert_eq!(vault.notes[0].updated_at, NOW_MS);
    assert!(kv.is_empty(), "load must not write");
}

#[test]
fn save_then_load_returns_equal_vault() {
    let kv = MemoryKeyValueStore::new();
    let store = VaultStore::new(&kv);
    let vault = populated_vault();

    store.save("u1", &vault).unwrap();

    assert_eq!(store.load("u1"), vault);
}

#[test]
fn empty_identity_neither_reads_nor_writes() {
    let kv = MemoryKeyValueStore::new();
    let store = VaultStore::with_clock(&kv, FixedClock::at(NOW_MS));
    let other = populated_vault();
    store.save("u1", &other).unwrap();

    store.save("", &VaultData::default()).unwrap();
    let loaded = store.load("");

    assert_eq!(loaded, VaultData::seeded(NOW_MS));
    assert_eq!(kv.len(), 1);
    assert_eq!(store.load("u1"), other);
}

#[test]
fn identities_are_isolated() {
    let kv = MemoryKeyValueStore::new();
    let store = VaultStore::with_clock(&kv, FixedClock::at(NOW_MS));

    store.save("alice", &populated_vault()).unwrap();

    assert_eq!(store.load("bob"), VaultData::seeded(NOW_MS));
}

#[test]
fn corrupt_record_loads_as_seeded_vault() {
    let kv = MemoryKeyValueStore::new();
    kv.insert_raw(KeyNamespace::data_key("u1"), "{not json");
    let store = VaultStore::with_clock(&kv, FixedClock::at(NOW_MS));

    assert_eq!(store.load("u1"), VaultData::seeded(NOW_MS));
}

#[test]
fn wrongly_typed_field_loads_as_seeded_vault() {
    let kv = MemoryKeyValueStore::new();
    kv.insert_raw(KeyNamespace::data_key("u1"), r#"{"tasks": "nope"}"#);
    let store = VaultStore::with_clock(&kv, FixedClock::at(NOW_MS));

    assert_eq!(store.load("u1"), VaultData::seeded(NOW_MS));
}

#[test]
fn partial_record_fills_missing_collections() {
    let kv = MemoryKeyValueStore::new();
    kv.insert_raw(
        KeyNamespace::data_key("u1"),
        r#"{"tasks":[{"id":"t1","text":"Legacy","completed":true,"createdAt":5}],"points":20}"#,
    );
    let store = VaultStore::new(&kv);

    let vault = store.load("u1");

    assert_eq!(vault.tasks.len(), 1);
    assert!(vault.tasks[0].completed);
    assert_eq!(vault.points, 20);
    assert!(vault.notes.is_empty());
    assert!(vault.voice_notes.is_empty());
}

#[test]
fn oversized_document_is_rejected_and_previous_value_kept() {
    let kv = MemoryKeyValueStore::with_quota(2048);
    let store = VaultStore::with_clock(&kv, FixedClock::at(NOW_MS));
    let small = VaultData::seeded(NOW_MS);
    store.save("u1", &small).unwrap();

    let mut large = small.clone();
    large.add_file(VaultFile::from_bytes(
        "big",
        "scan.bin",
        "application/octet-stream",
        &vec![7u8; 4096],
        NOW_MS,
    ));
    let err = store.save("u1", &large).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Write(KvError::QuotaExceeded { limit: 2048, .. })
    ));
    assert_eq!(store.load("u1"), small);
}

#[test]
fn sqlite_medium_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vault.db");
    let vault = populated_vault();

    {
        let conn = open_db(&path).unwrap();
        let kv = SqliteKeyValueStore::new(&conn);
        VaultStore::new(&kv).save("u1", &vault).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    assert_eq!(VaultStore::new(&kv).load("u1"), vault);
}

#[test]
fn sqlite_medium_replaces_and_removes_values() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    kv.set("k", "first").unwrap();
    kv.set("k", "second").unwrap();
    assert_eq!(kv.get("k").unwrap().as_deref(), Some("second"));

    kv.remove("k").unwrap();
    assert_eq!(kv.get("k").unwrap(), None);
    kv.remove("k").unwrap();
}

#[test]
fn sqlite_medium_enforces_quota() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::with_quota(&conn, Some(4));

    assert!(matches!(
        kv.set("k", "12345"),
        Err(KvError::QuotaExceeded { size: 5, limit: 4 })
    ));
    assert_eq!(kv.get("k").unwrap(), None);
}

#[test]
fn configured_medium_uses_config_quota() {
    let conn = open_db_in_memory().unwrap();
    let config = CoreConfig {
        storage_quota_bytes: Some(8),
        ..CoreConfig::default()
    };
    let kv = SqliteKeyValueStore::configured(&conn, &config);

    kv.set("k", "12345678").unwrap();
    assert!(matches!(
        kv.set("k", "123456789"),
        Err(KvError::QuotaExceeded { size: 9, limit: 8 })
    ));
    assert_eq!(kv.get("k").unwrap().as_deref(), Some("12345678"));
}

#[test]
fn non_finite_voice_duration_survives_reload() {
    let kv = MemoryKeyValueStore::new();
    let store = VaultStore::with_clock(&kv, FixedClock::at(NOW_MS));
    let mut vault = populated_vault();
    vault.voice_notes[0].duration = f64::NAN;

    store.save("u1", &vault).unwrap();
    let loaded = store.load("u1");

    assert_eq!(loaded.tasks, vault.tasks);
    assert_eq!(loaded.files, vault.files);
    assert_eq!(loaded.voice_notes.len(), 1);
    assert_eq!(loaded.voice_notes[0].duration, 0.0);
}

#[test]
fn load_reports_record_state() {
    let kv = MemoryKeyValueStore::new();
    let store = VaultStore::with_clock(&kv, FixedClock::at(NOW_MS));

    assert_eq!(store.load_with_state("u1").1, RecordState::Absent);

    store.save("u1", &populated_vault()).unwrap();
    assert_eq!(
        store.load_with_state("u1"),
        (populated_vault(), RecordState::Stored)
    );

    kv.insert_raw(KeyNamespace::data_key("u2"), "{not json");
    assert_eq!(
        store.load_with_state("u2"),
        (VaultData::seeded(NOW_MS), RecordState::Unreadable)
    );
}
