// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use bizdesk_app::{EntityStore, Record, RecordStore, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::storage::KeyValueStorage;

/// Suffix of the key that keeps a payload which could not be decoded.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

pub fn corrupt_key(key: &str) -> String {
    format!("{key}{CORRUPT_SUFFIX}")
}

/// An [`EntityStore`] that writes its full record list to a storage key after
/// every mutation. Writes are best effort: a failed write is logged and the
/// in-memory state stays as mutated.
///
/// Stored data that cannot be read is never overwritten. An undecodable
/// payload is copied to [`corrupt_key`] first; when that copy fails, or the
/// key could not be read at all, writes stay blocked for the session.
#[derive(Debug)]
pub struct PersistedStore<R: Record> {
    inner: EntityStore<R>,
    storage: Box<dyn KeyValueStorage>,
    key: String,
    writes_blocked: bool,
}

impl<R> PersistedStore<R>
where
    R: Record + Serialize + DeserializeOwned,
{
    /// Reads the records stored under `key`. Missing or unreadable data
    /// starts an empty store.
    pub fn load(mut storage: Box<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut writes_blocked = false;
        let inner = match storage.get(&key) {
            Ok(None) => EntityStore::new(),
            Ok(Some(raw)) => match decode_records::<R>(&raw, &key) {
                Ok(store) => store,
                Err(error) => {
                    let backup = corrupt_key(&key);
                    match storage.set(&backup, &raw) {
                        Ok(()) => warn!(
                            key = %key,
                            backup = %backup,
                            error = %format!("{error:#}"),
                            "moved unreadable stored records aside"
                        ),
                        Err(backup_error) => {
                            warn!(
                                key = %key,
                                error = %format!("{error:#}"),
                                backup_error = %format!("{backup_error:#}"),
                                "unreadable stored records could not be backed up; changes stay in memory"
                            );
                            writes_blocked = true;
                        }
                    }
                    EntityStore::new()
                }
            },
            Err(error) => {
                warn!(key = %key, error = %format!("{error:#}"), "stored records could not be read; changes stay in memory");
                writes_blocked = true;
                EntityStore::new()
            }
        };
        debug!(key = %key, kind = R::KIND, count = inner.len(), "loaded persisted records");
        Self {
            inner,
            storage,
            key,
            writes_blocked,
        }
    }

    /// Like [`Self::load`], but writes `seed` when nothing is stored yet.
    pub fn load_or_seed(
        storage: Box<dyn KeyValueStorage>,
        key: impl Into<String>,
        seed: impl FnOnce() -> Vec<R>,
    ) -> Self {
        let key = key.into();
        let stored = storage.get(&key);
        let mut store = Self::load(storage, key);
        if matches!(stored, Ok(None)) {
            store.inner = seeded(seed(), &store.key);
            store.persist();
        }
        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }

    /// False when the stored data could neither be read nor backed up.
    pub fn is_writable(&self) -> bool {
        !self.writes_blocked
    }

    pub fn into_parts(self) -> (EntityStore<R>, Box<dyn KeyValueStorage>) {
        (self.inner, self.storage)
    }

    /// Writes the current list, returning any storage error.
    pub fn flush(&mut self) -> Result<()> {
        if self.writes_blocked {
            bail!(
                "stored {} records under {} could not be read; not overwriting them -- repair or remove the key and reopen",
                R::KIND,
                self.key
            );
        }
        let payload = serde_json::to_string(self.inner.list())
            .with_context(|| format!("encode {} records", R::KIND))?;
        self.storage
            .set(&self.key, &payload)
            .with_context(|| format!("persist {} records under {}", R::KIND, self.key))?;
        debug!(key = %self.key, count = self.inner.len(), "persisted records");
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(error) = self.flush() {
            warn!(key = %self.key, error = %format!("{error:#}"), "keeping unsaved changes in memory");
        }
    }
}

/// Decodes a stored list. Duplicate ids count as unreadable.
fn decode_records<R>(raw: &str, key: &str) -> Result<EntityStore<R>>
where
    R: Record + DeserializeOwned,
{
    let records = serde_json::from_str::<Vec<R>>(raw)
        .with_context(|| format!("decode stored records under {key}"))?;
    EntityStore::with_records(records).with_context(|| format!("load stored records under {key}"))
}

fn seeded<R: Record>(records: Vec<R>, key: &str) -> EntityStore<R> {
    EntityStore::with_records(records).unwrap_or_else(|error| {
        warn!(key = %key, %error, "ignoring duplicate seed records");
        EntityStore::new()
    })
}

impl<R> RecordStore<R> for PersistedStore<R>
where
    R: Record + Serialize + DeserializeOwned,
{
    fn create(&mut self, draft: R::Draft) -> &R {
        let index = self.inner.len();
        self.inner.create(draft);
        self.persist();
        &self.inner.list()[index]
    }

    fn update(&mut self, id: R::Id, record: R) -> Result<&R, StoreError> {
        self.inner.update(id, record)?;
        self.persist();
        self.inner.get(id).ok_or_else(|| StoreError::not_found::<R>(id))
    }

    fn delete(&mut self, id: R::Id) -> Option<R> {
        let removed = self.inner.delete(id)?;
        self.persist();
        Some(removed)
    }

    fn mark_read(&mut self, id: R::Id) -> Result<bool, StoreError> {
        let changed = self.inner.mark_read(id)?;
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    fn list(&self) -> &[R] {
        self.inner.list()
    }

    fn get(&self, id: R::Id) -> Option<&R> {
        self.inner.get(id)
    }

    fn version(&self) -> u64 {
        self.inner.version()
    }
}
