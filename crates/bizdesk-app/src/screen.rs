// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::filter::{ListQuery, Projector, Searchable};
use crate::forms::{Bindable, FieldError, FormState};
use crate::model::SortDirection;
use crate::state::{Notice, SubViewName, ViewController, ViewEvent, ViewMode};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenKind {
    #[default]
    Contacts,
    Chat,
    Wallet,
    Calendar,
}

impl ScreenKind {
    pub const ALL: [Self; 4] = [Self::Contacts, Self::Chat, Self::Wallet, Self::Calendar];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::Chat => "chat",
            Self::Wallet => "wallet",
            Self::Calendar => "calendar",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// One master-detail screen: a store, its view state, the list query and
/// the drawer form while one is open. The form is open exactly while the
/// controller is in an edit mode. A form left for a sub view is parked with
/// the mode it belongs to and handed back on [`Screen::back`].
#[derive(Debug)]
pub struct Screen<R, S>
where
    R: Searchable + Bindable,
    S: RecordStore<R>,
{
    store: S,
    view: ViewController<R>,
    query: ListQuery<R::Filter>,
    projector: Projector<R>,
    form: Option<FormState>,
    parked: Option<(ViewMode<R::Id>, FormState)>,
}

impl<R, S> Screen<R, S>
where
    R: Searchable + Bindable,
    S: RecordStore<R>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            view: ViewController::new(),
            query: ListQuery::default(),
            projector: Projector::new(),
            form: None,
            parked: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn view(&self) -> &ViewController<R> {
        &self.view
    }

    pub fn mode(&self) -> ViewMode<R::Id> {
        self.view.mode()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.view.notice()
    }

    pub fn query(&self) -> &ListQuery<R::Filter> {
        &self.query
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.search_text = text.into();
    }

    pub fn set_filter(&mut self, filter: R::Filter) {
        self.query.active_filter = filter;
    }

    pub fn set_sort(&mut self, sort: Option<SortDirection>) {
        self.query.sort = sort;
    }

    /// Rows for the list panel under the current query.
    pub fn visible(&mut self) -> Vec<&R> {
        self.projector.rows(&self.store, &self.query)
    }

    pub fn selected(&self) -> Option<&R> {
        self.view.resolve(&self.store)
    }

    pub fn select(&mut self, id: R::Id) -> Vec<ViewEvent<R::Id>> {
        let events = self.view.select_for_view(&mut self.store, id);
        self.sync_form();
        events
    }

    pub fn open_create(&mut self) -> Vec<ViewEvent<R::Id>> {
        let events = self.view.start_create();
        self.form = Some(FormState::for_record::<R>(None));
        events
    }

    pub fn open_edit(&mut self, id: R::Id) -> Vec<ViewEvent<R::Id>> {
        let events = self.view.start_edit(&self.store, id);
        self.form = match self.view.mode() {
            ViewMode::Edit(Some(editing)) => {
                Some(FormState::for_record(self.store.get(editing)))
            }
            ViewMode::List | ViewMode::Detail(_) | ViewMode::Edit(None) | ViewMode::SubView(_) => {
                None
            }
        };
        events
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        self.form.as_mut()
    }

    /// Validates the open form and saves it. Field errors leave the form open
    /// and the store untouched.
    pub fn submit_form(&mut self) -> Result<Vec<ViewEvent<R::Id>>, Vec<FieldError>> {
        let Some(form) = &self.form else {
            return Ok(self.view.notify(Notice::NotEditing));
        };
        let draft = form.to_draft::<R>()?;
        let events = self.view.submit_edit(&mut self.store, draft);
        self.sync_form();
        Ok(events)
    }

    pub fn cancel_form(&mut self) -> Vec<ViewEvent<R::Id>> {
        let events = self.view.cancel_edit(&self.store);
        self.sync_form();
        events
    }

    pub fn delete(&mut self, id: R::Id) -> Vec<ViewEvent<R::Id>> {
        let events = self.view.on_delete(&mut self.store, id);
        self.sync_form();
        events
    }

    pub fn open_sub_view(
        &mut self,
        name: SubViewName,
        target: Option<R::Id>,
    ) -> Vec<ViewEvent<R::Id>> {
        let from = self.view.mode();
        let events = self.view.go_to_sub_view(&self.store, name, target);
        if self.view.previous() == Some(from) {
            self.parked = self.form.take().map(|form| (from, form));
        }
        self.sync_form();
        events
    }

    /// Returns to the remembered mode. Coming back into an edit mode reopens
    /// the parked form, or a fresh one when nothing was parked for it.
    pub fn back(&mut self) -> Vec<ViewEvent<R::Id>> {
        let events = self.view.back(&self.store);
        let mode = self.view.mode();
        let parked = self.parked.take();
        self.form = match mode {
            ViewMode::Edit(target) => match parked {
                Some((parked_mode, form)) if parked_mode == mode => Some(form),
                _ => Some(FormState::for_record(
                    target.and_then(|id| self.store.get(id)),
                )),
            },
            ViewMode::List | ViewMode::Detail(_) | ViewMode::SubView(_) => None,
        };
        events
    }

    pub fn clear_notice(&mut self) -> Vec<ViewEvent<R::Id>> {
        self.view.clear_notice()
    }

    pub fn location(&self) -> String {
        self.view.location()
    }

    pub fn restore_location(&mut self, query: &str) -> Vec<ViewEvent<R::Id>> {
        let events = self.view.restore_location(&mut self.store, query);
        self.sync_form();
        events
    }

    fn sync_form(&mut self) {
        if !self.view.mode().is_editing() {
            self.form = None;
        }
        if self.view.previous().is_none() {
            self.parked = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Screen, ScreenKind};
    use crate::ids::{ContactId, ConversationId};
    use crate::model::{
        Contact, ContactDraft, ContactFilter, Conversation, ConversationDraft, ConversationFilter,
        SortDirection,
    };
    use crate::state::{Notice, SubViewName, ViewEvent, ViewMode};
    use crate::store::{EntityStore, Record, RecordStore};

    fn contact_screen() -> Screen<Contact, EntityStore<Contact>> {
        let alice = Contact::from_draft(ContactId::new(1), ContactDraft::named("Alice"));
        Screen::new(EntityStore::with_records(vec![alice]).expect("seed contacts"))
    }

    fn names(screen: &mut Screen<Contact, EntityStore<Contact>>) -> Vec<String> {
        screen
            .visible()
            .into_iter()
            .map(|contact| contact.name.clone())
            .collect()
    }

    #[test]
    fn screen_kind_parse_is_case_insensitive() {
        assert_eq!(ScreenKind::parse(" Wallet "), Some(ScreenKind::Wallet));
        assert_eq!(ScreenKind::parse("inbox"), None);
        for kind in ScreenKind::ALL {
            assert_eq!(ScreenKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn create_through_form_adds_second_contact() -> anyhow::Result<()> {
        let mut screen = contact_screen();
        screen.open_create();
        let form = screen.form_mut().expect("create form open");
        form.set_field("name", "Bob")?;
        let entry = form.entries("emails").expect("emails group")[0].id;
        form.set_group_entry("emails", entry, "bob@example.com")?;

        let events = screen.submit_form().expect("valid form");
        let Some(ViewEvent::Created(bob)) = events.first().cloned() else {
            panic!("expected a create event, got {events:?}");
        };
        assert_ne!(bob, ContactId::new(1));
        assert_eq!(screen.store().len(), 2);
        assert_eq!(screen.mode(), ViewMode::Detail(bob));
        assert!(screen.form().is_none());
        assert_eq!(names(&mut screen), vec!["Alice", "Bob"]);
        Ok(())
    }

    #[test]
    fn invalid_form_stays_open() {
        let mut screen = contact_screen();
        screen.open_create();
        let errors = screen.submit_form().expect_err("blank form is invalid");
        assert!(!errors.is_empty());
        assert_eq!(screen.mode(), ViewMode::Edit(None));
        assert!(screen.form().is_some());
        assert_eq!(screen.store().len(), 1);
    }

    #[test]
    fn edit_prefills_and_replaces() -> anyhow::Result<()> {
        let mut screen = contact_screen();
        screen.select(ContactId::new(1));
        screen.open_edit(ContactId::new(1));

        let form = screen.form_mut().expect("edit form open");
        assert_eq!(form.value("name"), Some("Alice"));
        form.set_field("name", "Alicia")?;
        let entry = form.entries("emails").expect("emails group")[0].id;
        form.set_group_entry("emails", entry, "alicia@example.com")?;
        screen.submit_form().expect("valid form");

        assert_eq!(screen.mode(), ViewMode::Detail(ContactId::new(1)));
        assert_eq!(
            screen.selected().map(|contact| contact.name.as_str()),
            Some("Alicia")
        );
        assert_eq!(screen.store().len(), 1);
        Ok(())
    }

    #[test]
    fn cancel_and_delete_close_the_form() {
        let mut screen = contact_screen();
        screen.open_create();
        screen.cancel_form();
        assert_eq!(screen.mode(), ViewMode::List);
        assert!(screen.form().is_none());

        screen.open_edit(ContactId::new(1));
        assert!(screen.form().is_some());
        screen.delete(ContactId::new(1));
        assert_eq!(screen.mode(), ViewMode::List);
        assert!(screen.form().is_none());
        assert!(screen.visible().is_empty());
    }

    #[test]
    fn sub_view_from_edit_hands_the_form_back() -> anyhow::Result<()> {
        let mut screen = contact_screen();
        screen.open_edit(ContactId::new(1));
        let form = screen.form_mut().expect("edit form open");
        form.set_field("name", "Alicia")?;
        let entry = form.entries("emails").expect("emails group")[0].id;
        form.set_group_entry("emails", entry, "alicia@example.com")?;

        screen.open_sub_view(SubViewName::History, None);
        assert!(screen.form().is_none());

        screen.back();
        assert_eq!(screen.mode(), ViewMode::Edit(Some(ContactId::new(1))));
        assert_eq!(
            screen.form().and_then(|form| form.value("name")),
            Some("Alicia")
        );

        let events = screen.submit_form().expect("valid form");
        assert!(events.contains(&ViewEvent::Updated(ContactId::new(1))));
        assert_eq!(
            screen.selected().map(|contact| contact.name.as_str()),
            Some("Alicia")
        );
        Ok(())
    }

    #[test]
    fn sub_view_from_create_keeps_the_draft() -> anyhow::Result<()> {
        let mut screen = contact_screen();
        screen.open_create();
        screen
            .form_mut()
            .expect("create form open")
            .set_field("name", "Bob")?;

        screen.open_sub_view(SubViewName::History, None);
        screen.back();
        assert_eq!(screen.mode(), ViewMode::Edit(None));
        assert_eq!(screen.form().and_then(|form| form.value("name")), Some("Bob"));
        Ok(())
    }

    #[test]
    fn deleting_the_edited_record_from_a_sub_view_drops_the_form() {
        let mut screen = contact_screen();
        screen.open_edit(ContactId::new(1));
        screen.open_sub_view(SubViewName::History, None);
        screen.delete(ContactId::new(1));

        screen.back();
        assert_eq!(screen.mode(), ViewMode::List);
        assert!(screen.form().is_none());
    }

    #[test]
    fn submit_without_form_raises_notice() {
        let mut screen = contact_screen();
        let events = screen.submit_form().expect("no field errors");
        assert_eq!(events, vec![ViewEvent::NoticeRaised(Notice::NotEditing)]);
    }

    #[test]
    fn list_query_drives_visible_rows() {
        let mut screen = contact_screen();
        screen.open_create();
        if let Some(form) = screen.form_mut() {
            form.set_field("name", "bob").expect("name field");
            form.set_field("favorite", "true").expect("favorite field");
            let entry = form.entries("emails").expect("emails group")[0].id;
            form.set_group_entry("emails", entry, "bob@example.com")
                .expect("email entry");
        }
        screen.submit_form().expect("valid form");

        screen.set_filter(ContactFilter::Favorites);
        assert_eq!(names(&mut screen), vec!["bob"]);

        screen.set_filter(ContactFilter::All);
        screen.set_sort(Some(SortDirection::Desc));
        assert_eq!(names(&mut screen), vec!["bob", "Alice"]);

        screen.set_search("ALI");
        assert_eq!(names(&mut screen), vec!["Alice"]);
    }

    #[test]
    fn chat_screen_clears_unread_and_tracks_location() {
        let chat = Conversation::from_draft(
            ConversationId::new(2),
            ConversationDraft {
                contact_name: "Dana".to_owned(),
                last_message: "ping".to_owned(),
                unread: 3,
                pinned: false,
                online: true,
            },
        );
        let store = EntityStore::with_records(vec![chat]).expect("seed chats");
        let mut screen = Screen::new(store);
        screen.set_filter(ConversationFilter::Unread);
        assert_eq!(screen.visible().len(), 1);

        screen.restore_location("?id=2");
        assert_eq!(screen.mode(), ViewMode::Detail(ConversationId::new(2)));
        assert_eq!(screen.location(), "?id=2");
        assert!(screen.visible().is_empty());

        screen.open_sub_view(SubViewName::Conversation, Some(ConversationId::new(2)));
        screen.back();
        assert_eq!(screen.mode(), ViewMode::Detail(ConversationId::new(2)));
    }
}
