// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::ids::{IdAllocator, RecordId};

/// A domain entity held by a store. Ids are assigned by the store at creation
/// and never change afterwards.
pub trait Record: Clone + fmt::Debug {
    type Id: RecordId;
    type Draft;

    /// Singular noun used in notices and log lines.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
    fn with_id(self, id: Self::Id) -> Self;
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self;

    /// Clears an unread/pending marker, returning whether anything changed.
    fn clear_unread(&mut self) -> bool {
        false
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} not found -- choose an existing {kind} and retry")]
    NotFound { kind: &'static str, id: i64 },
    #[error("duplicate {kind} id {id} in seed data")]
    DuplicateId { kind: &'static str, id: i64 },
}

impl StoreError {
    pub fn not_found<R: Record>(id: R::Id) -> Self {
        Self::NotFound {
            kind: R::KIND,
            id: id.raw(),
        }
    }
}

/// The mutation surface the view controller drives. Implemented by the
/// in-memory [`EntityStore`] and by persistence wrappers around it.
pub trait RecordStore<R: Record> {
    fn create(&mut self, draft: R::Draft) -> &R;
    fn update(&mut self, id: R::Id, record: R) -> Result<&R, StoreError>;
    /// Removes the record. Deleting an absent id is a no-op returning `None`.
    fn delete(&mut self, id: R::Id) -> Option<R>;
    fn mark_read(&mut self, id: R::Id) -> Result<bool, StoreError>;
    fn list(&self) -> &[R];
    fn get(&self, id: R::Id) -> Option<&R>;
    /// Bumped on every mutation; projections key their caches on it.
    fn version(&self) -> u64;

    fn contains(&self, id: R::Id) -> bool {
        self.get(id).is_some()
    }

    fn len(&self) -> usize {
        self.list().len()
    }

    fn is_empty(&self) -> bool {
        self.list().is_empty()
    }
}

/// Ordered in-memory collection. Insertion order is the list order.
#[derive(Debug, Clone)]
pub struct EntityStore<R: Record> {
    records: Vec<R>,
    ids: IdAllocator,
    version: u64,
}

impl<R: Record> Default for EntityStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> EntityStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            ids: IdAllocator::default(),
            version: 0,
        }
    }

    /// Seeds the store with existing records, keeping their ids and order.
    pub fn with_records(records: Vec<R>) -> Result<Self, StoreError> {
        let mut seen = BTreeSet::new();
        let mut ids = IdAllocator::default();
        for record in &records {
            let id = record.id();
            if !seen.insert(id) {
                return Err(StoreError::DuplicateId {
                    kind: R::KIND,
                    id: id.raw(),
                });
            }
            ids.observe(id.raw());
        }
        Ok(Self {
            records,
            ids,
            version: 0,
        })
    }

    fn position(&self, id: R::Id) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl<R: Record> RecordStore<R> for EntityStore<R> {
    fn create(&mut self, draft: R::Draft) -> &R {
        let id: R::Id = self.ids.allocate();
        debug!(kind = R::KIND, %id, "create record");
        self.records.push(R::from_draft(id, draft));
        self.bump();
        let last = self.records.len() - 1;
        &self.records[last]
    }

    fn update(&mut self, id: R::Id, record: R) -> Result<&R, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::not_found::<R>(id))?;
        debug!(kind = R::KIND, %id, "replace record");
        self.records[index] = record.with_id(id);
        self.bump();
        Ok(&self.records[index])
    }

    fn delete(&mut self, id: R::Id) -> Option<R> {
        let index = self.position(id)?;
        debug!(kind = R::KIND, %id, "delete record");
        let removed = self.records.remove(index);
        self.bump();
        Some(removed)
    }

    fn mark_read(&mut self, id: R::Id) -> Result<bool, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::not_found::<R>(id))?;
        let changed = self.records[index].clear_unread();
        if changed {
            self.bump();
        }
        Ok(changed)
    }

    fn list(&self) -> &[R] {
        &self.records
    }

    fn get(&self, id: R::Id) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    fn version(&self) -> u64 {
        self.version
    }
}
