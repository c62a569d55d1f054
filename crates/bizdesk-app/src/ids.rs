// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Integer identity shared by every record kind.
pub trait RecordId: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display {
    fn from_raw(value: i64) -> Self;
    fn raw(self) -> i64;
}

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl RecordId for $name {
            fn from_raw(value: i64) -> Self {
                Self(value)
            }

            fn raw(self) -> i64 {
                self.0
            }
        }
    };
}

entity_id!(ContactId);
entity_id!(ConversationId);
entity_id!(TransactionId);
entity_id!(EventId);
entity_id!(EntryId);

/// Monotonic id source. Ids are never reused, even after deletes, and two
/// allocations in the same instant still differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next: i64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn allocate<Id: RecordId>(&mut self) -> Id {
        let id = Id::from_raw(self.next);
        self.next += 1;
        id
    }

    /// Moves the counter past `id` so seeded records never collide with new ones.
    pub fn observe(&mut self, id: i64) {
        if id >= self.next {
            self.next = id + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactId, EntryId, IdAllocator, RecordId};
    use std::collections::BTreeSet;

    #[test]
    fn allocations_are_unique_and_increasing() {
        let mut ids = IdAllocator::default();
        let allocated: Vec<ContactId> = (0..100).map(|_| ids.allocate()).collect();
        let unique = allocated.iter().copied().collect::<BTreeSet<_>>();
        assert_eq!(unique.len(), allocated.len());
        assert!(allocated.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn observe_skips_past_seeded_ids() {
        let mut ids = IdAllocator::default();
        ids.observe(41);
        ids.observe(7);
        let next: EntryId = ids.allocate();
        assert_eq!(next.get(), 42);
    }

    #[test]
    fn ids_display_as_raw_integers() {
        assert_eq!(ContactId::new(17).to_string(), "17");
        assert_eq!(ContactId::from_raw(3).raw(), 3);
    }
}
