// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use bizdesk_app::validation::format_cents;
use bizdesk_app::{
    Bindable, CalendarEvent, Contact, Conversation, EntityStore, EventPriority, RecordStore,
    Screen, ScreenKind, Searchable, Transaction, TransactionDirection, TransactionStatus,
};
use bizdesk_db::{CalendarStore, KeyValueStorage, open_calendar, open_calendar_or_seed};
use bizdesk_testkit::DeskFaker;
use std::fmt::Write as _;
use tracing::info;

const DEMO_CONTACTS: usize = 24;
const DEMO_CONVERSATIONS: usize = 12;
const DEMO_TRANSACTIONS: usize = 40;
const DEMO_EVENTS: usize = 30;

/// Seed for demo records; `None` opens every in-memory screen empty.
pub type DemoSeed = Option<u64>;

pub type ContactsScreen = Screen<Contact, EntityStore<Contact>>;
pub type ChatScreen = Screen<Conversation, EntityStore<Conversation>>;
pub type WalletScreen = Screen<Transaction, EntityStore<Transaction>>;
pub type CalendarScreen = Screen<CalendarEvent, CalendarStore>;

/// All four screens of one session. Only the calendar is backed by storage.
#[derive(Debug)]
pub struct Workspace {
    contacts: ContactsScreen,
    chat: ChatScreen,
    wallet: WalletScreen,
    calendar: CalendarScreen,
    start: ScreenKind,
}

impl Workspace {
    pub fn open(
        storage: Box<dyn KeyValueStorage>,
        start: ScreenKind,
        demo: DemoSeed,
    ) -> Result<Self> {
        let workspace = match demo {
            Some(seed) => {
                let mut faker = DeskFaker::new(seed);
                let contacts = seeded_screen(faker.contacts(DEMO_CONTACTS))?;
                let chat = seeded_screen(faker.conversations(DEMO_CONVERSATIONS))?;
                let wallet = seeded_screen(faker.transactions(DEMO_TRANSACTIONS))?;
                let calendar = open_calendar_or_seed(storage, || faker.events(DEMO_EVENTS));
                Self {
                    contacts,
                    chat,
                    wallet,
                    calendar: Screen::new(calendar),
                    start,
                }
            }
            None => Self {
                contacts: Screen::new(EntityStore::new()),
                chat: Screen::new(EntityStore::new()),
                wallet: Screen::new(EntityStore::new()),
                calendar: Screen::new(open_calendar(storage)),
                start,
            },
        };
        info!(
            start = workspace.start.as_str(),
            events = workspace.calendar.store().len(),
            demo = demo.is_some(),
            "opened workspace"
        );
        Ok(workspace)
    }

    pub fn start_screen(&self) -> ScreenKind {
        self.start
    }

    pub fn contacts(&mut self) -> &mut ContactsScreen {
        &mut self.contacts
    }

    pub fn chat(&mut self) -> &mut ChatScreen {
        &mut self.chat
    }

    pub fn wallet(&mut self) -> &mut WalletScreen {
        &mut self.wallet
    }

    pub fn calendar(&mut self) -> &mut CalendarScreen {
        &mut self.calendar
    }

    pub fn record_count(&self, kind: ScreenKind) -> usize {
        match kind {
            ScreenKind::Contacts => self.contacts.store().len(),
            ScreenKind::Chat => self.chat.store().len(),
            ScreenKind::Wallet => self.wallet.store().len(),
            ScreenKind::Calendar => self.calendar.store().len(),
        }
    }

    /// One line per screen; the start screen is marked with `*`.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();
        for kind in ScreenKind::ALL {
            let marker = if kind == self.start { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "{marker} {:<9} {:>4} {:<8} {}",
                kind.as_str(),
                self.record_count(kind),
                noun(kind),
                self.detail(kind)
            );
        }
        out
    }

    fn detail(&self, kind: ScreenKind) -> String {
        match kind {
            ScreenKind::Contacts => {
                let favorites = self
                    .contacts
                    .store()
                    .list()
                    .iter()
                    .filter(|contact| contact.favorite)
                    .count();
                format!("{favorites} favorites")
            }
            ScreenKind::Chat => {
                let unread: u64 = self
                    .chat
                    .store()
                    .list()
                    .iter()
                    .map(|conversation| u64::from(conversation.unread))
                    .sum();
                format!("{unread} unread")
            }
            ScreenKind::Wallet => {
                format!("net {}", format_cents(net_cents(self.wallet.store().list())))
            }
            ScreenKind::Calendar => {
                let high = self
                    .calendar
                    .store()
                    .list()
                    .iter()
                    .filter(|event| event.priority == Some(EventPriority::High))
                    .count();
                format!("{high} high priority")
            }
        }
    }
}

/// Completed incoming minus completed outgoing, saturating at the `i64` bounds.
pub fn net_cents(transactions: &[Transaction]) -> i64 {
    transactions
        .iter()
        .filter(|transaction| transaction.status == TransactionStatus::Completed)
        .map(|transaction| match transaction.direction {
            TransactionDirection::Incoming => transaction.amount_cents,
            TransactionDirection::Outgoing => transaction.amount_cents.saturating_neg(),
        })
        .fold(0i64, i64::saturating_add)
}

fn noun(kind: ScreenKind) -> &'static str {
    match kind {
        ScreenKind::Contacts => "contacts",
        ScreenKind::Chat => "chats",
        ScreenKind::Wallet => "payments",
        ScreenKind::Calendar => "events",
    }
}

fn seeded_screen<R>(records: Vec<R>) -> Result<Screen<R, EntityStore<R>>>
where
    R: Searchable + Bindable,
{
    let store = EntityStore::with_records(records)
        .with_context(|| format!("seed demo {} records", R::KIND))?;
    Ok(Screen::new(store))
}
