// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use bizdesk_app::{
    CalendarEvent, Contact, ContactId, ContactStatus, Conversation, ConversationId, EntryId,
    EventId, EventKind, EventPriority, GroupEntry, Transaction, TransactionDirection,
    TransactionId, TransactionStatus,
};
use std::path::PathBuf;
use time::macros::date;
use time::{Date, Duration};

const REFERENCE_DATE: Date = date!(2026 - 01 - 01);

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const COMPANIES: [&str; 12] = [
    "Acme Supply",
    "Northwind",
    "Summit Labs",
    "Bright Ledger",
    "Greenleaf Studio",
    "Harbor Freight Co",
    "Apex Logistics",
    "Cedar Analytics",
    "Blue Fern",
    "Hartley & Sons",
    "Juniper Media",
    "Quarry Partners",
];

const CONTACT_TAGS: [&str; 8] = [
    "VIP",
    "Regular",
    "Wholesale",
    "Supplier",
    "Press",
    "Investor",
    "Referral",
    "Newsletter",
];

const TRANSACTION_TITLES: [&str; 8] = [
    "Invoice",
    "Subscription",
    "Refund",
    "Payroll",
    "Office rent",
    "Consulting",
    "Ad spend",
    "Hardware",
];

const EVENT_TITLES: [&str; 10] = [
    "Team standup",
    "Client kickoff",
    "Quarterly review",
    "Vendor call",
    "Tax filing deadline",
    "Product demo",
    "Budget planning",
    "Hiring panel",
    "Follow-up reminder",
    "Dentist",
];

const LOCATIONS: [&str; 6] = [
    "HQ, room 2",
    "Zoom",
    "Client office",
    "Cafe downstairs",
    "Phone",
    "Warehouse",
];

const CATEGORIES: [&str; 5] = ["sales", "finance", "operations", "marketing", "hiring"];

const COLORS: [&str; 6] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#64748b",
];

const STATUSES: [ContactStatus; 4] = ContactStatus::ALL;

const EVENT_KINDS: [EventKind; 5] = [
    EventKind::Meeting,
    EventKind::Call,
    EventKind::Deadline,
    EventKind::Reminder,
    EventKind::Personal,
];

const PRIORITIES: [EventPriority; 3] =
    [EventPriority::Low, EventPriority::Medium, EventPriority::High];

const TRANSACTION_STATUSES: [TransactionStatus; 3] = [
    TransactionStatus::Pending,
    TransactionStatus::Completed,
    TransactionStatus::Failed,
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for demo data and test fixtures. The same seed always
/// yields the same records.
#[derive(Debug, Clone)]
pub struct DeskFaker {
    rng: DeterministicRng,
}

impl DeskFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn contact(&mut self, id: ContactId) -> Contact {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let company = self.pick(&COMPANIES);
        let domain = company
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();

        let mut emails = vec![GroupEntry {
            id: EntryId::new(1),
            value: format!("{}.{}@{domain}.example", first.to_lowercase(), last.to_lowercase()),
            is_primary: true,
        }];
        if self.rng.int_n(3) == 0 {
            emails.push(GroupEntry {
                id: EntryId::new(2),
                value: format!("{}@{domain}.example", first.to_lowercase()),
                is_primary: false,
            });
        }
        let phones = if self.rng.bool() {
            vec![GroupEntry {
                id: EntryId::new(3),
                value: self.phone(),
                is_primary: true,
            }]
        } else {
            Vec::new()
        };

        let tag_count = self.rng.int_n(3);
        let tags = (0..tag_count)
            .map(|_| self.pick(&CONTACT_TAGS).to_owned())
            .collect();

        Contact {
            id,
            name: format!("{first} {last}"),
            company: company.to_owned(),
            status: STATUSES[self.rng.int_n(STATUSES.len())],
            favorite: self.rng.int_n(4) == 0,
            tags,
            emails,
            phones,
            notes: self.sentence(4, 10),
        }
    }

    pub fn contacts(&mut self, count: usize) -> Vec<Contact> {
        (1..=count)
            .map(|id| self.contact(ContactId::new(id as i64)))
            .collect()
    }

    pub fn conversation(&mut self, id: ConversationId) -> Conversation {
        let unread = if self.rng.bool() {
            0
        } else {
            self.int_range_i64(1, 9) as u32
        };
        Conversation {
            id,
            contact_name: format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES)),
            last_message: self.sentence(3, 9),
            unread,
            pinned: self.rng.int_n(5) == 0,
            online: self.rng.bool(),
        }
    }

    pub fn conversations(&mut self, count: usize) -> Vec<Conversation> {
        (1..=count)
            .map(|id| self.conversation(ConversationId::new(id as i64)))
            .collect()
    }

    pub fn transaction(&mut self, id: TransactionId) -> Transaction {
        let direction = if self.rng.bool() {
            TransactionDirection::Incoming
        } else {
            TransactionDirection::Outgoing
        };
        Transaction {
            id,
            title: format!(
                "{} #{}",
                self.pick(&TRANSACTION_TITLES),
                self.int_range_i64(100, 999)
            ),
            counterparty: self.pick(&COMPANIES).to_owned(),
            amount_cents: self.int_range_i64(500, 500_000),
            direction,
            status: TRANSACTION_STATUSES[self.rng.int_n(TRANSACTION_STATUSES.len())],
            date: self.date_in_reference_year(),
            note: if self.rng.bool() {
                self.sentence(3, 8)
            } else {
                String::new()
            },
        }
    }

    pub fn transactions(&mut self, count: usize) -> Vec<Transaction> {
        (1..=count)
            .map(|id| self.transaction(TransactionId::new(id as i64)))
            .collect()
    }

    pub fn event(&mut self, id: EventId) -> CalendarEvent {
        let start_hour = self.int_range_i64(8, 17);
        let attendee_count = self.int_range_i64(1, 3);
        let attendees = (0..attendee_count)
            .map(|_| self.pick(&FIRST_NAMES).to_owned())
            .collect();
        let category = if self.rng.int_n(3) == 0 {
            None
        } else {
            Some(self.pick(&CATEGORIES).to_owned())
        };

        CalendarEvent {
            id,
            title: self.pick(&EVENT_TITLES).to_owned(),
            description: self.sentence(4, 12),
            date: self.date_in_reference_year(),
            start_time: format!("{start_hour:02}:00"),
            end_time: format!("{:02}:00", start_hour + 1),
            location: self.pick(&LOCATIONS).to_owned(),
            attendees,
            color: self.pick(&COLORS).to_owned(),
            event_type: Some(EVENT_KINDS[self.rng.int_n(EVENT_KINDS.len())]),
            priority: Some(PRIORITIES[self.rng.int_n(PRIORITIES.len())]),
            category,
        }
    }

    pub fn events(&mut self, count: usize) -> Vec<CalendarEvent> {
        (1..=count)
            .map(|id| self.event(EventId::new(id as i64)))
            .collect()
    }

    /// A date within 2026.
    pub fn date_in_reference_year(&mut self) -> Date {
        let offset = self.int_range_i64(0, 364);
        REFERENCE_DATE.saturating_add(Duration::days(offset))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn phone(&mut self) -> String {
        format!(
            "({}) {}-{:04}",
            self.int_range_i64(200, 989),
            self.int_range_i64(200, 999),
            self.int_range_i64(0, 9999)
        )
    }

    fn sentence(&mut self, min_words: usize, max_words: usize) -> String {
        const WORDS: [&str; 24] = [
            "follow",
            "up",
            "invoice",
            "proposal",
            "contract",
            "meeting",
            "shipment",
            "quote",
            "schedule",
            "review",
            "budget",
            "launch",
            "renewal",
            "payment",
            "call",
            "draft",
            "approve",
            "confirm",
            "order",
            "pricing",
            "deadline",
            "update",
            "team",
            "client",
        ];

        let count = self.int_range_i64(min_words as i64, max_words as i64) as usize;
        let mut parts = Vec::with_capacity(count);
        for _ in 0..count {
            parts.push(self.pick(&WORDS).to_owned());
        }
        let mut sentence = parts.join(" ");
        if let Some(first) = sentence.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        sentence.push('.');
        sentence
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("bizdesk.db");
    Ok((dir, db_path))
}

pub fn fixture_date() -> Date {
    REFERENCE_DATE
}
