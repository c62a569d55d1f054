// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use bizdesk_app::{
    CalendarEvent, CalendarEventDraft, EventId, Notice, RecordStore, Screen, ViewMode,
};
use bizdesk_db::{
    CALENDAR_EVENTS_KEY, KeyValueStorage, MemoryStorage, PersistedStore, SqliteStorage,
    corrupt_key, decode_events, open_calendar, open_calendar_or_seed, validate_db_path,
};
use bizdesk_testkit::{DeskFaker, fixture_date, temp_db_path};

/// Reads fine, refuses every write.
#[derive(Debug, Default)]
struct ReadOnlyStorage;

impl KeyValueStorage for ReadOnlyStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        bail!("quota exceeded writing {key}")
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        bail!("quota exceeded removing {key}")
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Memory storage that cannot write backup keys.
#[derive(Debug)]
struct NoBackupStorage(MemoryStorage);

impl KeyValueStorage for NoBackupStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.0.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if key.ends_with(".corrupt") {
            bail!("disk full writing {key}");
        }
        self.0.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.0.remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.0.keys()
    }
}

fn draft(title: &str) -> CalendarEventDraft {
    CalendarEventDraft {
        title: title.to_owned(),
        description: String::new(),
        date: fixture_date(),
        start_time: "09:00".to_owned(),
        end_time: "09:30".to_owned(),
        location: "Zoom".to_owned(),
        attendees: vec!["Quinn".to_owned()],
        color: "#10b981".to_owned(),
        event_type: None,
        priority: None,
        category: None,
    }
}

#[test]
fn validate_db_path_rejects_uri_forms() {
    assert!(validate_db_path("file:test.db").is_err());
    assert!(validate_db_path("https://example.com/db.sqlite").is_err());
    assert!(validate_db_path("db.sqlite?mode=ro").is_err());
    assert!(validate_db_path("").is_err());
    assert!(validate_db_path("/tmp/bizdesk.db").is_ok());
    assert!(validate_db_path(":memory:").is_ok());
}

#[test]
fn calendar_survives_reopen() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    let seed = DeskFaker::new(21).events(5);

    let created = {
        let storage = SqliteStorage::open(&path)?;
        let mut calendar = open_calendar_or_seed(Box::new(storage), || seed.clone());
        assert_eq!(calendar.list(), seed.as_slice());
        calendar.create(draft("Board meeting")).clone()
    };
    assert_eq!(created.id, EventId::new(6));

    let reopened = open_calendar(Box::new(SqliteStorage::open(&path)?));
    assert_eq!(reopened.len(), 6);
    assert_eq!(&reopened.list()[..5], seed.as_slice());
    assert_eq!(reopened.get(created.id), Some(&created));
    Ok(())
}

#[test]
fn seed_is_ignored_once_events_are_stored() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    {
        let storage = SqliteStorage::open(&path)?;
        let _ = open_calendar_or_seed(Box::new(storage), || DeskFaker::new(1).events(3));
    }

    let storage = SqliteStorage::open(&path)?;
    let calendar = open_calendar_or_seed(Box::new(storage), || DeskFaker::new(2).events(9));
    assert_eq!(calendar.list(), DeskFaker::new(1).events(3).as_slice());
    Ok(())
}

#[test]
fn sqlite_stamps_updates_and_lists_keys() -> Result<()> {
    let mut storage = SqliteStorage::open_memory()?;
    assert_eq!(storage.updated_at(CALENDAR_EVENTS_KEY)?, None);

    let mut calendar = open_calendar(Box::new(MemoryStorage::new()));
    calendar.create(draft("Standup"));
    calendar.flush()?;
    let payload = calendar
        .storage()
        .get(CALENDAR_EVENTS_KEY)?
        .unwrap_or_default();

    storage.set(CALENDAR_EVENTS_KEY, &payload)?;
    storage.set("theme", "dark")?;
    assert!(storage.updated_at(CALENDAR_EVENTS_KEY)?.is_some());
    assert_eq!(storage.keys()?, vec![CALENDAR_EVENTS_KEY, "theme"]);
    assert_eq!(decode_events(&payload)?.len(), 1);

    storage.remove("theme")?;
    assert_eq!(storage.get("theme")?, None);
    Ok(())
}

#[test]
fn existing_table_missing_columns_is_rejected() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    {
        let conn = rusqlite::Connection::open(&path)?;
        conn.execute_batch("CREATE TABLE local_storage (key TEXT PRIMARY KEY, value TEXT);")?;
    }

    let error = SqliteStorage::open(&path).expect_err("incomplete schema should fail");
    assert!(error.to_string().contains("missing required columns: updated_at"));
    Ok(())
}

#[test]
fn failed_writes_keep_in_memory_changes() -> Result<()> {
    let mut calendar: PersistedStore<CalendarEvent> =
        PersistedStore::load(Box::new(ReadOnlyStorage), CALENDAR_EVENTS_KEY);

    let first = calendar.create(draft("Vendor call")).id;
    let second = calendar.create(draft("Dentist")).id;
    assert_ne!(first, second);

    let mut renamed = calendar.get(first).cloned().expect("first event");
    renamed.title = "Vendor call (moved)".to_owned();
    calendar.update(first, renamed.clone())?;
    assert!(calendar.delete(second).is_some());

    assert_eq!(calendar.list(), &[renamed]);
    let error = calendar.flush().expect_err("read-only storage");
    assert!(format!("{error:#}").contains("quota exceeded"));
    Ok(())
}

#[test]
fn unreadable_payload_starts_empty_and_is_kept_aside() -> Result<()> {
    let storage = MemoryStorage::new().with_entry(CALENDAR_EVENTS_KEY, "{not json");
    let mut calendar = open_calendar(Box::new(storage));
    assert!(calendar.is_empty());

    let created = calendar.create(draft("Fresh start")).clone();
    let raw = calendar
        .storage()
        .get(CALENDAR_EVENTS_KEY)?
        .unwrap_or_default();
    assert_eq!(decode_events(&raw)?, vec![created]);
    assert_eq!(
        calendar.storage().get(&corrupt_key(CALENDAR_EVENTS_KEY))?.as_deref(),
        Some("{not json")
    );
    Ok(())
}

#[test]
fn unreadable_payload_is_never_overwritten_without_a_backup() -> Result<()> {
    let storage =
        NoBackupStorage(MemoryStorage::new().with_entry(CALENDAR_EVENTS_KEY, "{not json"));
    let mut calendar = open_calendar(Box::new(storage));
    assert!(!calendar.is_writable());

    let created = calendar.create(draft("Lost on restart")).id;
    assert_eq!(
        calendar.get(created).map(|event| event.title.as_str()),
        Some("Lost on restart")
    );
    assert_eq!(
        calendar.storage().get(CALENDAR_EVENTS_KEY)?.as_deref(),
        Some("{not json")
    );

    let error = calendar.flush().expect_err("writes stay blocked");
    assert!(format!("{error:#}").contains("not overwriting"));
    Ok(())
}

#[test]
fn sqlite_keeps_unreadable_payload_aside_across_reopen() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    {
        let mut storage = SqliteStorage::open(&path)?;
        storage.set(CALENDAR_EVENTS_KEY, r#"[{"id":1,"title":"Half"}]"#)?;
    }
    {
        let mut calendar = open_calendar(Box::new(SqliteStorage::open(&path)?));
        calendar.create(draft("After repair"));
    }

    let storage = SqliteStorage::open(&path)?;
    assert_eq!(
        storage.get(&corrupt_key(CALENDAR_EVENTS_KEY))?.as_deref(),
        Some(r#"[{"id":1,"title":"Half"}]"#)
    );
    let reopened = open_calendar(Box::new(storage));
    assert_eq!(reopened.len(), 1);
    Ok(())
}

#[test]
fn stale_location_fails_closed_after_delete_elsewhere() -> Result<()> {
    let (_dir, path) = temp_db_path()?;
    let seed = DeskFaker::new(4).events(3);
    let doomed = seed[1].id;

    // Another session deletes the event and writes first.
    {
        let storage = SqliteStorage::open(&path)?;
        let mut other = open_calendar_or_seed(Box::new(storage), || seed.clone());
        other.delete(doomed);
    }

    let mut screen = Screen::new(open_calendar(Box::new(SqliteStorage::open(&path)?)));
    assert_eq!(screen.store().len(), 2);
    screen.restore_location(&format!("?id={doomed}"));
    assert_eq!(screen.mode(), ViewMode::List);
    assert_eq!(
        screen.notice(),
        Some(&Notice::NotFound {
            kind: "event",
            id: doomed.get(),
        })
    );
    Ok(())
}
