// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;
use tracing::debug;

use crate::ids::RecordId;
use crate::store::{Record, RecordStore};

const LOCATION_ID_PARAM: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubViewName {
    History,
    TransactionDetail,
    EventDetail,
    Conversation,
}

impl SubViewName {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::TransactionDetail => "transaction",
            Self::EventDetail => "event",
            Self::Conversation => "conversation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubView<Id> {
    pub name: SubViewName,
    pub target: Option<Id>,
}

/// Which panel a screen shows. `Edit(None)` is the create form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode<Id> {
    List,
    Detail(Id),
    Edit(Option<Id>),
    SubView(SubView<Id>),
}

impl<Id: Copy + Eq> ViewMode<Id> {
    /// The record this mode points at, if any.
    pub fn record_id(&self) -> Option<Id> {
        match self {
            Self::List | Self::Edit(None) => None,
            Self::Detail(id) | Self::Edit(Some(id)) => Some(*id),
            Self::SubView(sub_view) => sub_view.target,
        }
    }

    pub fn references(&self, id: Id) -> bool {
        self.record_id() == Some(id)
    }

    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Edit(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NotFound { kind: &'static str, id: i64 },
    InvalidLocation(String),
    NotEditing,
    Saved { kind: &'static str, id: i64 },
    Deleted { kind: &'static str, id: i64 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { kind, id } => {
                write!(f, "{kind} {id} not found -- it may have been deleted")
            }
            Self::InvalidLocation(raw) => {
                write!(f, "ignored invalid id {raw:?} in location -- showing the list")
            }
            Self::NotEditing => f.write_str("nothing to save -- open a form first"),
            Self::Saved { kind, id } => write!(f, "{kind} {id} saved"),
            Self::Deleted { kind, id } => write!(f, "{kind} {id} deleted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent<Id> {
    ModeChanged(ViewMode<Id>),
    UnreadCleared(Id),
    Created(Id),
    Updated(Id),
    Deleted(Id),
    NoticeRaised(Notice),
    NoticeCleared,
}

/// Navigation state for one list screen. Holds ids only; every read goes
/// back through the store so a deleted record is never shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewController<R: Record> {
    mode: ViewMode<R::Id>,
    previous: Option<ViewMode<R::Id>>,
    notice: Option<Notice>,
}

impl<R: Record> Default for ViewController<R> {
    fn default() -> Self {
        Self {
            mode: ViewMode::List,
            previous: None,
            notice: None,
        }
    }
}

impl<R: Record> ViewController<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn mode(&self) -> ViewMode<R::Id> {
        self.mode
    }

    pub const fn previous(&self) -> Option<ViewMode<R::Id>> {
        self.previous
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) -> Vec<ViewEvent<R::Id>> {
        if self.notice.take().is_some() {
            vec![ViewEvent::NoticeCleared]
        } else {
            Vec::new()
        }
    }

    pub fn notify(&mut self, notice: Notice) -> Vec<ViewEvent<R::Id>> {
        vec![self.raise(notice)]
    }

    /// The record currently shown, re-resolved against `store`.
    pub fn resolve<'s, S: RecordStore<R>>(&self, store: &'s S) -> Option<&'s R> {
        self.mode.record_id().and_then(|id| store.get(id))
    }

    /// Opens the detail panel and clears the record's unread marker.
    pub fn select_for_view<S: RecordStore<R>>(
        &mut self,
        store: &mut S,
        id: R::Id,
    ) -> Vec<ViewEvent<R::Id>> {
        match store.mark_read(id) {
            Ok(cleared) => {
                let mut events = vec![self.set_mode(ViewMode::Detail(id))];
                if cleared {
                    events.push(ViewEvent::UnreadCleared(id));
                }
                events
            }
            Err(_) => self.fail_closed(id),
        }
    }

    pub fn start_create(&mut self) -> Vec<ViewEvent<R::Id>> {
        vec![self.set_mode(ViewMode::Edit(None))]
    }

    pub fn start_edit<S: RecordStore<R>>(&mut self, store: &S, id: R::Id) -> Vec<ViewEvent<R::Id>> {
        if !store.contains(id) {
            return self.fail_closed(id);
        }
        vec![self.set_mode(ViewMode::Edit(Some(id)))]
    }

    pub fn cancel_edit<S: RecordStore<R>>(&mut self, store: &S) -> Vec<ViewEvent<R::Id>> {
        match self.mode {
            ViewMode::Edit(Some(id)) if store.contains(id) => {
                vec![self.set_mode(ViewMode::Detail(id))]
            }
            ViewMode::Edit(Some(id)) => self.fail_closed(id),
            ViewMode::Edit(None) => vec![self.set_mode(ViewMode::List)],
            ViewMode::List | ViewMode::Detail(_) | ViewMode::SubView(_) => Vec::new(),
        }
    }

    /// Creates or replaces the record behind the open form, then shows it.
    pub fn submit_edit<S: RecordStore<R>>(
        &mut self,
        store: &mut S,
        draft: R::Draft,
    ) -> Vec<ViewEvent<R::Id>> {
        match self.mode {
            ViewMode::Edit(None) => {
                let id = store.create(draft).id();
                let mut events = vec![ViewEvent::Created(id)];
                events.push(self.set_mode(ViewMode::Detail(id)));
                events.push(self.raise(Notice::Saved {
                    kind: R::KIND,
                    id: id.raw(),
                }));
                events
            }
            ViewMode::Edit(Some(id)) => match store.update(id, R::from_draft(id, draft)) {
                Ok(_) => {
                    let mut events = vec![ViewEvent::Updated(id)];
                    events.push(self.set_mode(ViewMode::Detail(id)));
                    events.push(self.raise(Notice::Saved {
                        kind: R::KIND,
                        id: id.raw(),
                    }));
                    events
                }
                Err(_) => self.fail_closed(id),
            },
            ViewMode::List | ViewMode::Detail(_) | ViewMode::SubView(_) => {
                vec![self.raise(Notice::NotEditing)]
            }
        }
    }

    /// Enters a sub view, remembering the current mode for a single [`Self::back`].
    pub fn go_to_sub_view<S: RecordStore<R>>(
        &mut self,
        store: &S,
        name: SubViewName,
        target: Option<R::Id>,
    ) -> Vec<ViewEvent<R::Id>> {
        if let Some(id) = target
            && !store.contains(id)
        {
            return self.fail_closed(id);
        }
        self.previous = Some(self.mode);
        vec![self.set_mode(ViewMode::SubView(SubView { name, target }))]
    }

    pub fn back<S: RecordStore<R>>(&mut self, store: &S) -> Vec<ViewEvent<R::Id>> {
        let target = self.previous.take().unwrap_or(ViewMode::List);
        if let Some(id) = target.record_id()
            && !store.contains(id)
        {
            return self.fail_closed(id);
        }
        vec![self.set_mode(target)]
    }

    pub fn on_delete<S: RecordStore<R>>(
        &mut self,
        store: &mut S,
        id: R::Id,
    ) -> Vec<ViewEvent<R::Id>> {
        if store.delete(id).is_none() {
            return self.fail_closed(id);
        }

        let mut events = vec![ViewEvent::Deleted(id)];
        if self.previous.is_some_and(|previous| previous.references(id)) {
            self.previous = None;
        }
        if self.mode.references(id) {
            events.push(self.set_mode(ViewMode::List));
        }
        events.push(self.raise(Notice::Deleted {
            kind: R::KIND,
            id: id.raw(),
        }));
        events
    }

    /// `?id=<id>` while a record is selected, empty otherwise.
    pub fn location(&self) -> String {
        match self.mode {
            ViewMode::Detail(id) | ViewMode::Edit(Some(id)) => {
                format!("?{LOCATION_ID_PARAM}={id}")
            }
            ViewMode::List | ViewMode::Edit(None) | ViewMode::SubView(_) => String::new(),
        }
    }

    /// Rebuilds the mode from a shared location query such as `?id=4`.
    pub fn restore_location<S: RecordStore<R>>(
        &mut self,
        store: &mut S,
        query: &str,
    ) -> Vec<ViewEvent<R::Id>> {
        let query = query.trim().trim_start_matches('?');
        let raw = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == LOCATION_ID_PARAM)
            .map(|(_, value)| value.into_owned());

        self.previous = None;
        let Some(raw) = raw else {
            return vec![self.set_mode(ViewMode::List)];
        };
        match raw.trim().parse::<i64>() {
            Ok(value) => self.select_for_view(store, R::Id::from_raw(value)),
            Err(_) => vec![
                self.set_mode(ViewMode::List),
                self.raise(Notice::InvalidLocation(raw)),
            ],
        }
    }

    fn set_mode(&mut self, mode: ViewMode<R::Id>) -> ViewEvent<R::Id> {
        debug!(kind = R::KIND, from = ?self.mode, to = ?mode, "view mode change");
        self.mode = mode;
        ViewEvent::ModeChanged(mode)
    }

    fn raise(&mut self, notice: Notice) -> ViewEvent<R::Id> {
        self.notice = Some(notice.clone());
        ViewEvent::NoticeRaised(notice)
    }

    fn fail_closed(&mut self, id: R::Id) -> Vec<ViewEvent<R::Id>> {
        debug!(kind = R::KIND, %id, "missing record, falling back to list");
        self.previous = None;
        vec![
            self.set_mode(ViewMode::List),
            self.raise(Notice::NotFound {
                kind: R::KIND,
                id: id.raw(),
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{Notice, SubView, SubViewName, ViewController, ViewEvent, ViewMode};
    use crate::ids::{ContactId, ConversationId, TransactionId};
    use crate::model::{
        Contact, ContactDraft, Conversation, ConversationDraft, Transaction, TransactionDirection,
        TransactionDraft, TransactionStatus,
    };
    use crate::store::{EntityStore, Record, RecordStore};
    use time::{Date, Month};

    fn contacts() -> EntityStore<Contact> {
        let alice = Contact::from_draft(ContactId::new(1), ContactDraft::named("Alice"));
        EntityStore::with_records(vec![alice]).expect("seed contacts")
    }

    fn transactions() -> EntityStore<Transaction> {
        let paid = Transaction::from_draft(
            TransactionId::new(10),
            TransactionDraft {
                title: "Invoice 42".to_owned(),
                counterparty: "Acme".to_owned(),
                amount_cents: 12_500,
                direction: TransactionDirection::Incoming,
                status: TransactionStatus::Completed,
                date: Date::from_calendar_date(2026, Month::January, 5).expect("valid date"),
                note: String::new(),
            },
        );
        EntityStore::with_records(vec![paid]).expect("seed transactions")
    }

    #[test]
    fn select_then_delete_resolves_to_list() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();

        view.select_for_view(&mut store, ContactId::new(1));
        assert_eq!(view.mode(), ViewMode::Detail(ContactId::new(1)));
        assert_eq!(
            view.resolve(&store).map(|contact| contact.name.as_str()),
            Some("Alice")
        );

        let events = view.on_delete(&mut store, ContactId::new(1));
        assert_eq!(view.mode(), ViewMode::List);
        assert_eq!(
            events,
            vec![
                ViewEvent::Deleted(ContactId::new(1)),
                ViewEvent::ModeChanged(ViewMode::List),
                ViewEvent::NoticeRaised(Notice::Deleted {
                    kind: "contact",
                    id: 1
                }),
            ]
        );
        assert!(view.resolve(&store).is_none());
    }

    #[test]
    fn create_then_cancel_returns_to_list() {
        let store = contacts();
        let mut view = ViewController::<Contact>::new();

        view.start_create();
        assert_eq!(view.mode(), ViewMode::Edit(None));
        view.cancel_edit(&store);
        assert_eq!(view.mode(), ViewMode::List);
    }

    #[test]
    fn cancel_edit_returns_to_detail() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();

        view.select_for_view(&mut store, ContactId::new(1));
        view.start_edit(&store, ContactId::new(1));
        assert_eq!(view.mode(), ViewMode::Edit(Some(ContactId::new(1))));
        view.cancel_edit(&store);
        assert_eq!(view.mode(), ViewMode::Detail(ContactId::new(1)));
    }

    #[test]
    fn missing_ids_fail_closed_with_notice() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();

        let events = view.select_for_view(&mut store, ContactId::new(99));
        assert_eq!(view.mode(), ViewMode::List);
        assert_eq!(
            events.last(),
            Some(&ViewEvent::NoticeRaised(Notice::NotFound {
                kind: "contact",
                id: 99
            }))
        );

        view.select_for_view(&mut store, ContactId::new(1));
        view.start_edit(&store, ContactId::new(42));
        assert_eq!(view.mode(), ViewMode::List);
        assert!(view.notice().is_some());
    }

    #[test]
    fn deleting_missing_id_fails_closed() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();
        view.select_for_view(&mut store, ContactId::new(1));

        view.on_delete(&mut store, ContactId::new(5));
        assert_eq!(view.mode(), ViewMode::List);
        assert_eq!(
            view.notice(),
            Some(&Notice::NotFound {
                kind: "contact",
                id: 5
            })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn submit_creates_then_updates() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();

        view.start_create();
        let events = view.submit_edit(&mut store, ContactDraft::named("Bob"));
        let ViewMode::Detail(bob) = view.mode() else {
            panic!("expected detail mode after create, got {:?}", view.mode());
        };
        assert_eq!(events.first(), Some(&ViewEvent::Created(bob)));
        assert_ne!(bob, ContactId::new(1));
        assert_eq!(store.len(), 2);

        view.start_edit(&store, bob);
        view.submit_edit(&mut store, ContactDraft::named("Robert"));
        assert_eq!(view.mode(), ViewMode::Detail(bob));
        assert_eq!(store.get(bob).map(|c| c.name.as_str()), Some("Robert"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn submit_outside_edit_is_rejected() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();

        let events = view.submit_edit(&mut store, ContactDraft::named("Nope"));
        assert_eq!(events, vec![ViewEvent::NoticeRaised(Notice::NotEditing)]);
        assert_eq!(store.len(), 1);
        assert_eq!(view.mode(), ViewMode::List);
    }

    #[test]
    fn submit_after_concurrent_delete_fails_closed() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();

        view.start_edit(&store, ContactId::new(1));
        store.delete(ContactId::new(1));
        view.submit_edit(&mut store, ContactDraft::named("Alice 2"));
        assert_eq!(view.mode(), ViewMode::List);
        assert!(store.is_empty());
    }

    #[test]
    fn selecting_conversation_clears_unread() {
        let chat = Conversation::from_draft(
            ConversationId::new(3),
            ConversationDraft {
                contact_name: "Dana".to_owned(),
                last_message: "see you".to_owned(),
                unread: 5,
                pinned: true,
                online: false,
            },
        );
        let mut store = EntityStore::with_records(vec![chat]).expect("seed chats");
        let mut view = ViewController::<Conversation>::new();

        let events = view.select_for_view(&mut store, ConversationId::new(3));
        assert_eq!(
            events,
            vec![
                ViewEvent::ModeChanged(ViewMode::Detail(ConversationId::new(3))),
                ViewEvent::UnreadCleared(ConversationId::new(3)),
            ]
        );
        assert_eq!(store.list()[0].unread, 0);
    }

    #[test]
    fn sub_view_back_restores_previous_once() {
        let mut store = transactions();
        let mut view = ViewController::<Transaction>::new();

        view.go_to_sub_view(&store, SubViewName::History, None);
        view.go_to_sub_view(
            &store,
            SubViewName::TransactionDetail,
            Some(TransactionId::new(10)),
        );
        assert_eq!(
            view.previous(),
            Some(ViewMode::SubView(SubView {
                name: SubViewName::History,
                target: None
            }))
        );

        view.back(&store);
        assert_eq!(
            view.mode(),
            ViewMode::SubView(SubView {
                name: SubViewName::History,
                target: None
            })
        );
        view.back(&store);
        assert_eq!(view.mode(), ViewMode::List);

        view.select_for_view(&mut store, TransactionId::new(10));
        view.go_to_sub_view(&store, SubViewName::History, None);
        view.on_delete(&mut store, TransactionId::new(10));
        assert_eq!(view.previous(), None);
        view.back(&store);
        assert_eq!(view.mode(), ViewMode::List);
    }

    #[test]
    fn sub_view_from_edit_returns_to_edit() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();

        view.start_edit(&store, ContactId::new(1));
        view.go_to_sub_view(&store, SubViewName::History, None);
        assert_eq!(view.previous(), Some(ViewMode::Edit(Some(ContactId::new(1)))));
        view.back(&store);
        assert_eq!(view.mode(), ViewMode::Edit(Some(ContactId::new(1))));

        view.go_to_sub_view(&store, SubViewName::History, None);
        store.delete(ContactId::new(1));
        view.back(&store);
        assert_eq!(view.mode(), ViewMode::List);
    }

    #[test]
    fn sub_view_for_missing_target_fails_closed() {
        let store = transactions();
        let mut view = ViewController::<Transaction>::new();
        view.go_to_sub_view(
            &store,
            SubViewName::TransactionDetail,
            Some(TransactionId::new(11)),
        );
        assert_eq!(view.mode(), ViewMode::List);
        assert_eq!(view.previous(), None);
    }

    #[test]
    fn location_round_trip() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();
        assert_eq!(view.location(), "");

        view.select_for_view(&mut store, ContactId::new(1));
        let location = view.location();
        assert_eq!(location, "?id=1");

        let mut restored = ViewController::<Contact>::new();
        restored.restore_location(&mut store, &location);
        assert_eq!(restored.mode(), ViewMode::Detail(ContactId::new(1)));

        restored.restore_location(&mut store, "?tab=contacts");
        assert_eq!(restored.mode(), ViewMode::List);
    }

    #[test]
    fn location_with_bad_or_unknown_id_shows_list() {
        let mut store = contacts();
        let mut view = ViewController::<Contact>::new();

        view.restore_location(&mut store, "?id=abc");
        assert_eq!(view.mode(), ViewMode::List);
        assert_eq!(
            view.notice(),
            Some(&Notice::InvalidLocation("abc".to_owned()))
        );

        view.restore_location(&mut store, "id=77");
        assert_eq!(view.mode(), ViewMode::List);
        assert_eq!(
            view.notice().map(ToString::to_string),
            Some("contact 77 not found -- it may have been deleted".to_owned())
        );

        assert_eq!(view.clear_notice(), vec![ViewEvent::NoticeCleared]);
        assert!(view.clear_notice().is_empty());
    }
}
