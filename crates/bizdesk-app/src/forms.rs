// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::fmt;
use time::Date;

use crate::ids::{EntryId, IdAllocator};
use crate::model::{
    CalendarEvent, CalendarEventDraft, Contact, ContactDraft, ContactStatus, Conversation,
    ConversationDraft, EventKind, EventPriority, GroupEntry, Transaction, TransactionDirection,
    TransactionDraft, TransactionStatus,
};
use crate::store::Record;
use crate::validation::{
    CLOCK_LAYOUT, DATE_LAYOUT, format_cents_input, format_date, format_tags, parse_clock,
    parse_flag, parse_optional_count, parse_required_cents, parse_required_date, parse_tags,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Money,
    /// Non-negative whole number that fits in `u32`.
    Count,
    Date,
    Clock,
    /// Comma separated list.
    Tags,
    Choice(&'static [&'static str]),
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn blank_value(&self) -> String {
        match self.kind {
            FieldKind::Choice(options) if self.required => {
                options.first().map_or_else(String::new, |option| (*option).to_owned())
            }
            FieldKind::Flag => "false".to_owned(),
            FieldKind::Text
            | FieldKind::Money
            | FieldKind::Count
            | FieldKind::Date
            | FieldKind::Clock
            | FieldKind::Tags
            | FieldKind::Choice(_) => String::new(),
        }
    }
}

/// A repeatable sub-group such as a contact's email addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSchema {
    pub fields: &'static [FieldSpec],
    pub groups: &'static [GroupSpec],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&'static GroupSpec> {
        self.groups.iter().find(|spec| spec.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("form has no field named {0:?}")]
    UnknownField(String),
    #[error("form has no group named {0:?}")]
    UnknownGroup(String),
    #[error("{group} has no entry {entry}")]
    UnknownEntry { group: &'static str, entry: EntryId },
    #[error("{group} needs at least one entry -- add another before removing this one")]
    LastEntry { group: &'static str },
    #[error("{0} has no usable value -- validate the form first")]
    MissingValue(String),
}

/// A per-field validation failure. Collected, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Records that can be edited through a [`FormState`].
pub trait Bindable: Record {
    const SCHEMA: &'static FormSchema;

    fn form_values(&self) -> Vec<(&'static str, String)>;

    fn form_groups(&self) -> Vec<(&'static str, Vec<GroupEntry>)> {
        Vec::new()
    }

    fn from_form(form: &ValidatedForm) -> Result<Self::Draft, FormError>;
}

/// Editable text state for one drawer form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    schema: &'static FormSchema,
    values: BTreeMap<&'static str, String>,
    groups: BTreeMap<&'static str, Vec<GroupEntry>>,
    entry_ids: IdAllocator,
}

impl FormState {
    /// Prefills from `record`, or builds the blank template with one empty
    /// primary entry per group.
    pub fn from_record<R: Bindable>(schema: &'static FormSchema, record: Option<&R>) -> Self {
        let mut values = schema
            .fields
            .iter()
            .map(|spec| (spec.name, spec.blank_value()))
            .collect::<BTreeMap<_, _>>();
        let mut groups = schema
            .groups
            .iter()
            .map(|spec| (spec.name, Vec::new()))
            .collect::<BTreeMap<_, _>>();
        let mut entry_ids = IdAllocator::default();

        if let Some(record) = record {
            for (name, value) in record.form_values() {
                if let Some(spec) = schema.field(name) {
                    values.insert(spec.name, value);
                }
            }
            for (name, entries) in record.form_groups() {
                if let Some(spec) = schema.group(name) {
                    for entry in &entries {
                        entry_ids.observe(entry.id.get());
                    }
                    groups.insert(spec.name, entries);
                }
            }
        }

        for entries in groups.values_mut() {
            if entries.is_empty() {
                entries.push(GroupEntry {
                    id: entry_ids.allocate(),
                    value: String::new(),
                    is_primary: true,
                });
            }
        }

        Self {
            schema,
            values,
            groups,
            entry_ids,
        }
    }

    pub fn for_record<R: Bindable>(record: Option<&R>) -> Self {
        Self::from_record(R::SCHEMA, record)
    }

    pub const fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn entries(&self, group: &str) -> Option<&[GroupEntry]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let spec = self
            .schema
            .field(name)
            .ok_or_else(|| FormError::UnknownField(name.to_owned()))?;
        self.values.insert(spec.name, value.into());
        Ok(())
    }

    /// Appends an empty entry. Only the first entry of a group starts as primary.
    pub fn add_group_entry(&mut self, group: &str) -> Result<EntryId, FormError> {
        let id = self.entry_ids.allocate();
        let entries = self.group_mut(group)?;
        let is_primary = entries.is_empty();
        entries.push(GroupEntry {
            id,
            value: String::new(),
            is_primary,
        });
        Ok(id)
    }

    pub fn set_group_entry(
        &mut self,
        group: &str,
        entry: EntryId,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        let slot = self.entry_mut(group, entry)?;
        slot.value = value.into();
        Ok(())
    }

    pub fn set_primary(&mut self, group: &str, entry: EntryId) -> Result<(), FormError> {
        self.entry_mut(group, entry)?;
        for candidate in self.group_mut(group)? {
            candidate.is_primary = candidate.id == entry;
        }
        Ok(())
    }

    /// Removes an entry, promoting the first remaining one if it was primary.
    /// The last entry of a group cannot be removed.
    pub fn remove_group_entry(&mut self, group: &str, entry: EntryId) -> Result<(), FormError> {
        let group_name = self.group_spec(group)?.name;
        let entries = self.group_mut(group)?;
        let index = entries
            .iter()
            .position(|candidate| candidate.id == entry)
            .ok_or(FormError::UnknownEntry {
                group: group_name,
                entry,
            })?;
        if entries.len() == 1 {
            return Err(FormError::LastEntry { group: group_name });
        }

        let removed = entries.remove(index);
        if removed.is_primary
            && let Some(first) = entries.first_mut()
        {
            first.is_primary = true;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<ValidatedForm, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut values = BTreeMap::new();

        for spec in self.schema.fields {
            let raw = self.value(spec.name).unwrap_or_default().trim();
            if raw.is_empty() {
                if spec.required && spec.kind != FieldKind::Flag {
                    errors.push(FieldError::new(
                        spec.name,
                        format!("{} is required -- enter a value and retry", spec.label),
                    ));
                }
                values.insert(spec.name, String::new());
                continue;
            }
            if let Err(message) = check_value(spec, raw) {
                errors.push(FieldError::new(spec.name, message));
                continue;
            }
            values.insert(spec.name, raw.to_owned());
        }

        let mut groups = BTreeMap::new();
        for spec in self.schema.groups {
            let entries = normalize_entries(self.entries(spec.name).unwrap_or_default());
            if spec.required && entries.is_empty() {
                errors.push(FieldError::new(
                    spec.name,
                    format!("{} needs at least one entry -- fill one in and retry", spec.label),
                ));
            }
            groups.insert(spec.name, entries);
        }

        if errors.is_empty() {
            Ok(ValidatedForm { values, groups })
        } else {
            Err(errors)
        }
    }

    /// Validates and converts to a draft in one step.
    pub fn to_draft<R: Bindable>(&self) -> Result<R::Draft, Vec<FieldError>> {
        let validated = self.validate()?;
        R::from_form(&validated).map_err(|error| {
            vec![FieldError::new("form", error.to_string())]
        })
    }

    fn group_spec(&self, group: &str) -> Result<&'static GroupSpec, FormError> {
        self.schema
            .group(group)
            .ok_or_else(|| FormError::UnknownGroup(group.to_owned()))
    }

    fn group_mut(&mut self, group: &str) -> Result<&mut Vec<GroupEntry>, FormError> {
        let name = self.group_spec(group)?.name;
        Ok(self.groups.entry(name).or_default())
    }

    fn entry_mut(&mut self, group: &str, entry: EntryId) -> Result<&mut GroupEntry, FormError> {
        let group_name = self.group_spec(group)?.name;
        self.group_mut(group)?
            .iter_mut()
            .find(|candidate| candidate.id == entry)
            .ok_or(FormError::UnknownEntry {
                group: group_name,
                entry,
            })
    }
}

fn check_value(spec: &FieldSpec, raw: &str) -> Result<(), String> {
    match spec.kind {
        FieldKind::Text | FieldKind::Tags | FieldKind::Flag => Ok(()),
        FieldKind::Money => parse_required_cents(raw)
            .map(|_| ())
            .map_err(|error| format!("{}: {error} -- enter an amount like 1250.00", spec.label)),
        FieldKind::Count => parse_optional_count(raw)
            .map(|_| ())
            .map_err(|error| format!("{}: {error} -- enter a whole number", spec.label)),
        FieldKind::Date => parse_required_date(raw)
            .map(|_| ())
            .map_err(|error| format!("{}: {error} -- use {DATE_LAYOUT}", spec.label)),
        FieldKind::Clock => parse_clock(raw)
            .map(|_| ())
            .map_err(|error| format!("{}: {error} -- use {CLOCK_LAYOUT}", spec.label)),
        FieldKind::Choice(options) => {
            if options.contains(&raw) {
                Ok(())
            } else {
                Err(format!("{} must be one of: {}", spec.label, options.join(", ")))
            }
        }
    }
}

fn normalize_entries(entries: &[GroupEntry]) -> Vec<GroupEntry> {
    let mut kept = entries
        .iter()
        .filter(|entry| !entry.value.trim().is_empty())
        .map(|entry| GroupEntry {
            id: entry.id,
            value: entry.value.trim().to_owned(),
            is_primary: entry.is_primary,
        })
        .collect::<Vec<_>>();
    let primary = kept.iter().position(|entry| entry.is_primary).unwrap_or(0);
    for (index, entry) in kept.iter_mut().enumerate() {
        entry.is_primary = index == primary;
    }
    kept
}

/// Checked, trimmed form values. Only [`FormState::validate`] builds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    values: BTreeMap<&'static str, String>,
    groups: BTreeMap<&'static str, Vec<GroupEntry>>,
}

impl ValidatedForm {
    pub fn text(&self, name: &str) -> Result<&str, FormError> {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| FormError::MissingValue(name.to_owned()))
    }

    pub fn optional_text(&self, name: &str) -> Result<Option<String>, FormError> {
        let value = self.text(name)?;
        Ok((!value.is_empty()).then(|| value.to_owned()))
    }

    pub fn money(&self, name: &str) -> Result<i64, FormError> {
        parse_required_cents(self.text(name)?).map_err(|_| missing(name))
    }

    pub fn count(&self, name: &str) -> Result<Option<u32>, FormError> {
        parse_optional_count(self.text(name)?).map_err(|_| missing(name))
    }

    pub fn date(&self, name: &str) -> Result<Date, FormError> {
        parse_required_date(self.text(name)?).map_err(|_| missing(name))
    }

    /// Re-renders a clock value as zero-padded `HH:MM`.
    pub fn clock(&self, name: &str) -> Result<String, FormError> {
        let value = parse_clock(self.text(name)?).map_err(|_| missing(name))?;
        Ok(format!("{:02}:{:02}", value.hour(), value.minute()))
    }

    pub fn tags(&self, name: &str) -> Result<Vec<String>, FormError> {
        self.text(name).map(parse_tags)
    }

    pub fn flag(&self, name: &str) -> Result<bool, FormError> {
        self.text(name).map(parse_flag)
    }

    pub fn choice<T>(&self, name: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T, FormError> {
        parse(self.text(name)?).ok_or_else(|| missing(name))
    }

    pub fn optional_choice<T>(
        &self,
        name: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, FormError> {
        let value = self.text(name)?;
        if value.is_empty() {
            return Ok(None);
        }
        parse(value).map(Some).ok_or_else(|| missing(name))
    }

    /// Non-blank entries with exactly one primary.
    pub fn group(&self, name: &str) -> Result<Vec<GroupEntry>, FormError> {
        self.groups
            .get(name)
            .cloned()
            .ok_or_else(|| FormError::UnknownGroup(name.to_owned()))
    }
}

fn missing(name: &str) -> FormError {
    FormError::MissingValue(name.to_owned())
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Text => "text",
            Self::Money => "money",
            Self::Count => "count",
            Self::Date => "date",
            Self::Clock => "time",
            Self::Tags => "tags",
            Self::Choice(_) => "choice",
            Self::Flag => "flag",
        };
        f.write_str(label)
    }
}

const CONTACT_STATUS_CHOICES: &[&str] = &["lead", "customer", "partner", "inactive"];
const DIRECTION_CHOICES: &[&str] = &["incoming", "outgoing"];
const TRANSACTION_STATUS_CHOICES: &[&str] = &["pending", "completed", "failed"];
const EVENT_KIND_CHOICES: &[&str] = &["meeting", "call", "deadline", "reminder", "personal"];
const PRIORITY_CHOICES: &[&str] = &["low", "medium", "high"];

pub const CONTACT_FORM: FormSchema = FormSchema {
    fields: &[
        FieldSpec::new("name", "name", FieldKind::Text).required(),
        FieldSpec::new("company", "company", FieldKind::Text),
        FieldSpec::new("status", "status", FieldKind::Choice(CONTACT_STATUS_CHOICES)).required(),
        FieldSpec::new("favorite", "favorite", FieldKind::Flag),
        FieldSpec::new("tags", "tags", FieldKind::Tags),
        FieldSpec::new("notes", "notes", FieldKind::Text),
    ],
    groups: &[
        GroupSpec {
            name: "emails",
            label: "email",
            required: true,
        },
        GroupSpec {
            name: "phones",
            label: "phone",
            required: false,
        },
    ],
};

pub const CONVERSATION_FORM: FormSchema = FormSchema {
    fields: &[
        FieldSpec::new("contact_name", "contact", FieldKind::Text).required(),
        FieldSpec::new("last_message", "last message", FieldKind::Text),
        FieldSpec::new("unread", "unread count", FieldKind::Count),
        FieldSpec::new("pinned", "pinned", FieldKind::Flag),
        FieldSpec::new("online", "online", FieldKind::Flag),
    ],
    groups: &[],
};

pub const TRANSACTION_FORM: FormSchema = FormSchema {
    fields: &[
        FieldSpec::new("title", "title", FieldKind::Text).required(),
        FieldSpec::new("counterparty", "counterparty", FieldKind::Text),
        FieldSpec::new("amount", "amount", FieldKind::Money).required(),
        FieldSpec::new("direction", "direction", FieldKind::Choice(DIRECTION_CHOICES)).required(),
        FieldSpec::new(
            "status",
            "status",
            FieldKind::Choice(TRANSACTION_STATUS_CHOICES),
        )
        .required(),
        FieldSpec::new("date", "date", FieldKind::Date).required(),
        FieldSpec::new("note", "note", FieldKind::Text),
    ],
    groups: &[],
};

pub const EVENT_FORM: FormSchema = FormSchema {
    fields: &[
        FieldSpec::new("title", "title", FieldKind::Text).required(),
        FieldSpec::new("description", "description", FieldKind::Text),
        FieldSpec::new("date", "date", FieldKind::Date).required(),
        FieldSpec::new("start_time", "start time", FieldKind::Clock).required(),
        FieldSpec::new("end_time", "end time", FieldKind::Clock).required(),
        FieldSpec::new("location", "location", FieldKind::Text),
        FieldSpec::new("attendees", "attendees", FieldKind::Tags),
        FieldSpec::new("color", "color", FieldKind::Text),
        FieldSpec::new("event_type", "type", FieldKind::Choice(EVENT_KIND_CHOICES)),
        FieldSpec::new("priority", "priority", FieldKind::Choice(PRIORITY_CHOICES)),
        FieldSpec::new("category", "category", FieldKind::Text),
    ],
    groups: &[],
};

fn flag_value(value: bool) -> String {
    value.to_string()
}

impl Bindable for Contact {
    const SCHEMA: &'static FormSchema = &CONTACT_FORM;

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("company", self.company.clone()),
            ("status", self.status.as_str().to_owned()),
            ("favorite", flag_value(self.favorite)),
            ("tags", format_tags(&self.tags)),
            ("notes", self.notes.clone()),
        ]
    }

    fn form_groups(&self) -> Vec<(&'static str, Vec<GroupEntry>)> {
        vec![("emails", self.emails.clone()), ("phones", self.phones.clone())]
    }

    fn from_form(form: &ValidatedForm) -> Result<ContactDraft, FormError> {
        Ok(ContactDraft {
            name: form.text("name")?.to_owned(),
            company: form.text("company")?.to_owned(),
            status: form.choice("status", ContactStatus::parse)?,
            favorite: form.flag("favorite")?,
            tags: form.tags("tags")?,
            emails: form.group("emails")?,
            phones: form.group("phones")?,
            notes: form.text("notes")?.to_owned(),
        })
    }
}

impl Bindable for Conversation {
    const SCHEMA: &'static FormSchema = &CONVERSATION_FORM;

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("contact_name", self.contact_name.clone()),
            ("last_message", self.last_message.clone()),
            ("unread", self.unread.to_string()),
            ("pinned", flag_value(self.pinned)),
            ("online", flag_value(self.online)),
        ]
    }

    fn from_form(form: &ValidatedForm) -> Result<ConversationDraft, FormError> {
        Ok(ConversationDraft {
            contact_name: form.text("contact_name")?.to_owned(),
            last_message: form.text("last_message")?.to_owned(),
            unread: form.count("unread")?.unwrap_or(0),
            pinned: form.flag("pinned")?,
            online: form.flag("online")?,
        })
    }
}

impl Bindable for Transaction {
    const SCHEMA: &'static FormSchema = &TRANSACTION_FORM;

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("counterparty", self.counterparty.clone()),
            ("amount", format_cents_input(self.amount_cents)),
            ("direction", self.direction.as_str().to_owned()),
            ("status", self.status.as_str().to_owned()),
            ("date", format_date(self.date)),
            ("note", self.note.clone()),
        ]
    }

    fn from_form(form: &ValidatedForm) -> Result<TransactionDraft, FormError> {
        Ok(TransactionDraft {
            title: form.text("title")?.to_owned(),
            counterparty: form.text("counterparty")?.to_owned(),
            amount_cents: form.money("amount")?,
            direction: form.choice("direction", TransactionDirection::parse)?,
            status: form.choice("status", TransactionStatus::parse)?,
            date: form.date("date")?,
            note: form.text("note")?.to_owned(),
        })
    }
}

impl Bindable for CalendarEvent {
    const SCHEMA: &'static FormSchema = &EVENT_FORM;

    fn form_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("date", format_date(self.date)),
            ("start_time", self.start_time.clone()),
            ("end_time", self.end_time.clone()),
            ("location", self.location.clone()),
            ("attendees", format_tags(&self.attendees)),
            ("color", self.color.clone()),
            (
                "event_type",
                self.event_type
                    .map(|kind| kind.as_str().to_owned())
                    .unwrap_or_default(),
            ),
            (
                "priority",
                self.priority
                    .map(|priority| priority.as_str().to_owned())
                    .unwrap_or_default(),
            ),
            ("category", self.category.clone().unwrap_or_default()),
        ]
    }

    fn from_form(form: &ValidatedForm) -> Result<CalendarEventDraft, FormError> {
        Ok(CalendarEventDraft {
            title: form.text("title")?.to_owned(),
            description: form.text("description")?.to_owned(),
            date: form.date("date")?,
            start_time: form.clock("start_time")?,
            end_time: form.clock("end_time")?,
            location: form.text("location")?.to_owned(),
            attendees: form.tags("attendees")?,
            color: form.text("color")?.to_owned(),
            event_type: form.optional_choice("event_type", EventKind::parse)?,
            priority: form.optional_choice("priority", EventPriority::parse)?,
            category: form.optional_text("category")?,
        })
    }
}
