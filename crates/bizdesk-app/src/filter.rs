// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::cmp::Ordering;
use std::fmt;

use crate::ids::RecordId;
use crate::model::SortDirection;
use crate::store::{Record, RecordStore};

/// How a record takes part in list search and filtering.
pub trait Searchable: Record {
    type Filter: Clone + PartialEq + Default + fmt::Debug;

    /// Text fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;
    fn matches_filter(&self, filter: &Self::Filter) -> bool;
    fn sort_label(&self) -> &str;
}

/// Transient list state: search text, active filter, optional sort.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery<F> {
    pub search_text: String,
    pub active_filter: F,
    pub sort: Option<SortDirection>,
}

impl<F: Default> ListQuery<F> {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search_text: text.into(),
            ..Self::default()
        }
    }
}

impl<F> ListQuery<F> {
    pub fn with_filter(mut self, filter: F) -> Self {
        self.active_filter = filter;
        self
    }

    pub fn sorted(mut self, direction: SortDirection) -> Self {
        self.sort = Some(direction);
        self
    }
}

pub fn matches_search<R: Searchable>(record: &R, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Search AND filter over `records`, insertion order unless a sort is set.
pub fn project<'a, R: Searchable>(records: &'a [R], query: &ListQuery<R::Filter>) -> Vec<&'a R> {
    let mut rows = records
        .iter()
        .filter(|record| {
            record.matches_filter(&query.active_filter) && matches_search(*record, &query.search_text)
        })
        .collect::<Vec<_>>();

    if let Some(direction) = query.sort {
        rows.sort_by(|left, right| {
            let order = compare_labels(left.sort_label(), right.sort_label());
            let order = match direction {
                SortDirection::Asc => order,
                SortDirection::Desc => order.reverse(),
            };
            order.then_with(|| left.id().cmp(&right.id()))
        });
    }

    rows
}

fn compare_labels(left: &str, right: &str) -> Ordering {
    left.to_lowercase().cmp(&right.to_lowercase())
}

#[derive(Debug, Clone, PartialEq)]
struct CachedProjection<F, Id> {
    version: u64,
    query: ListQuery<F>,
    ids: Vec<Id>,
}

/// Memoized [`project`]. The cache is keyed on the store version and the
/// whole query, so a mutation always forces a recompute.
#[derive(Debug, Clone)]
pub struct Projector<R: Searchable> {
    cached: Option<CachedProjection<R::Filter, R::Id>>,
}

impl<R: Searchable> Default for Projector<R> {
    fn default() -> Self {
        Self { cached: None }
    }
}

impl<R: Searchable> Projector<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids<S: RecordStore<R>>(&mut self, store: &S, query: &ListQuery<R::Filter>) -> Vec<R::Id> {
        if let Some(cached) = &self.cached
            && cached.version == store.version()
            && cached.query == *query
        {
            return cached.ids.clone();
        }

        let ids = project(store.list(), query)
            .into_iter()
            .map(Record::id)
            .collect::<Vec<_>>();
        self.cached = Some(CachedProjection {
            version: store.version(),
            query: query.clone(),
            ids: ids.clone(),
        });
        ids
    }

    pub fn rows<'s, S: RecordStore<R>>(
        &mut self,
        store: &'s S,
        query: &ListQuery<R::Filter>,
    ) -> Vec<&'s R> {
        self.ids(store, query)
            .into_iter()
            .filter_map(|id| store.get(id))
            .collect()
    }

    pub fn is_cached_for(&self, version: u64) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|cached| cached.version == version)
    }
}

/// Raw ids of a projection, for logging and assertions.
pub fn raw_ids<R: Record>(rows: &[&R]) -> Vec<i64> {
    rows.iter().map(|record| record.id().raw()).collect()
}
