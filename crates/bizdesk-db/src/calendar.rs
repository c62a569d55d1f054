// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! The business calendar is the one screen whose records outlive the process.
//! Events are stored as a JSON array under [`CALENDAR_EVENTS_KEY`].

use anyhow::{Context, Result};
use bizdesk_app::CalendarEvent;

use crate::persisted::PersistedStore;
use crate::storage::KeyValueStorage;

pub const CALENDAR_EVENTS_KEY: &str = "business-calendar-events";

pub type CalendarStore = PersistedStore<CalendarEvent>;

pub fn open_calendar(storage: Box<dyn KeyValueStorage>) -> CalendarStore {
    PersistedStore::load(storage, CALENDAR_EVENTS_KEY)
}

/// Opens the calendar, writing `seed` on first run.
pub fn open_calendar_or_seed(
    storage: Box<dyn KeyValueStorage>,
    seed: impl FnOnce() -> Vec<CalendarEvent>,
) -> CalendarStore {
    PersistedStore::load_or_seed(storage, CALENDAR_EVENTS_KEY, seed)
}

pub fn encode_events(events: &[CalendarEvent]) -> Result<String> {
    serde_json::to_string(events).context("encode calendar events")
}

pub fn decode_events(raw: &str) -> Result<Vec<CalendarEvent>> {
    serde_json::from_str(raw)
        .context("decode calendar events -- stored data is not a JSON event list")
}
