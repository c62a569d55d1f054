// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::filter::Searchable;
use crate::ids::*;
use crate::store::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactStatus {
    Lead,
    Customer,
    Partner,
    Inactive,
}

impl ContactStatus {
    pub const ALL: [Self; 4] = [Self::Lead, Self::Customer, Self::Partner, Self::Inactive];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Customer => "customer",
            Self::Partner => "partner",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "lead" => Some(Self::Lead),
            "customer" => Some(Self::Customer),
            "partner" => Some(Self::Partner),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionDirection {
    Incoming,
    Outgoing,
}

impl TransactionDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "incoming" => Some(Self::Incoming),
            "outgoing" => Some(Self::Outgoing),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Meeting,
    Call,
    Deadline,
    Reminder,
    Personal,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meeting => "meeting",
            Self::Call => "call",
            Self::Deadline => "deadline",
            Self::Reminder => "reminder",
            Self::Personal => "personal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "meeting" => Some(Self::Meeting),
            "call" => Some(Self::Call),
            "deadline" => Some(Self::Deadline),
            "reminder" => Some(Self::Reminder),
            "personal" => Some(Self::Personal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPriority {
    Low,
    Medium,
    High,
}

impl EventPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One entry of a repeatable sub-group (a contact's emails or phones).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub id: EntryId,
    pub value: String,
    pub is_primary: bool,
}

impl GroupEntry {
    pub fn primary_value(entries: &[Self]) -> Option<&str> {
        entries
            .iter()
            .find(|entry| entry.is_primary)
            .or_else(|| entries.first())
            .map(|entry| entry.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub company: String,
    pub status: ContactStatus,
    pub favorite: bool,
    pub tags: Vec<String>,
    pub emails: Vec<GroupEntry>,
    pub phones: Vec<GroupEntry>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub company: String,
    pub status: ContactStatus,
    pub favorite: bool,
    pub tags: Vec<String>,
    pub emails: Vec<GroupEntry>,
    pub phones: Vec<GroupEntry>,
    pub notes: String,
}

impl ContactDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            company: String::new(),
            status: ContactStatus::Lead,
            favorite: false,
            tags: Vec::new(),
            emails: Vec::new(),
            phones: Vec::new(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactFilter {
    #[default]
    All,
    Favorites,
    Status(ContactStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub contact_name: String,
    pub last_message: String,
    pub unread: u32,
    pub pinned: bool,
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationDraft {
    pub contact_name: String,
    pub last_message: String,
    pub unread: u32,
    pub pinned: bool,
    pub online: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationFilter {
    #[default]
    All,
    Unread,
    Pinned,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub title: String,
    pub counterparty: String,
    pub amount_cents: i64,
    pub direction: TransactionDirection,
    pub status: TransactionStatus,
    pub date: Date,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub title: String,
    pub counterparty: String,
    pub amount_cents: i64,
    pub direction: TransactionDirection,
    pub status: TransactionStatus,
    pub date: Date,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    #[default]
    All,
    Incoming,
    Outgoing,
    Pending,
}

/// A business calendar entry. The serde layout is the persisted one: camelCase
/// keys, `type` for the kind, and `date` as an ISO timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub color: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<EventPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventDraft {
    pub title: String,
    pub description: String,
    pub date: Date,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub attendees: Vec<String>,
    pub color: String,
    pub event_type: Option<EventKind>,
    pub priority: Option<EventPriority>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Kind(EventKind),
    HighPriority,
}

impl Record for Contact {
    type Id = ContactId;
    type Draft = ContactDraft;
    const KIND: &'static str = "contact";

    fn id(&self) -> ContactId {
        self.id
    }

    fn with_id(mut self, id: ContactId) -> Self {
        self.id = id;
        self
    }

    fn from_draft(id: ContactId, draft: ContactDraft) -> Self {
        Self {
            id,
            name: draft.name,
            company: draft.company,
            status: draft.status,
            favorite: draft.favorite,
            tags: draft.tags,
            emails: draft.emails,
            phones: draft.phones,
            notes: draft.notes,
        }
    }
}

impl Searchable for Contact {
    type Filter = ContactFilter;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(1 + self.tags.len());
        fields.push(self.name.as_str());
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn matches_filter(&self, filter: &ContactFilter) -> bool {
        match filter {
            ContactFilter::All => true,
            ContactFilter::Favorites => self.favorite,
            ContactFilter::Status(status) => self.status == *status,
        }
    }

    fn sort_label(&self) -> &str {
        &self.name
    }
}

impl Record for Conversation {
    type Id = ConversationId;
    type Draft = ConversationDraft;
    const KIND: &'static str = "conversation";

    fn id(&self) -> ConversationId {
        self.id
    }

    fn with_id(mut self, id: ConversationId) -> Self {
        self.id = id;
        self
    }

    fn from_draft(id: ConversationId, draft: ConversationDraft) -> Self {
        Self {
            id,
            contact_name: draft.contact_name,
            last_message: draft.last_message,
            unread: draft.unread,
            pinned: draft.pinned,
            online: draft.online,
        }
    }

    fn clear_unread(&mut self) -> bool {
        if self.unread == 0 {
            return false;
        }
        self.unread = 0;
        true
    }
}

impl Searchable for Conversation {
    type Filter = ConversationFilter;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.contact_name.as_str(), self.last_message.as_str()]
    }

    fn matches_filter(&self, filter: &ConversationFilter) -> bool {
        match filter {
            ConversationFilter::All => true,
            ConversationFilter::Unread => self.unread > 0,
            ConversationFilter::Pinned => self.pinned,
        }
    }

    fn sort_label(&self) -> &str {
        &self.contact_name
    }
}

impl Record for Transaction {
    type Id = TransactionId;
    type Draft = TransactionDraft;
    const KIND: &'static str = "transaction";

    fn id(&self) -> TransactionId {
        self.id
    }

    fn with_id(mut self, id: TransactionId) -> Self {
        self.id = id;
        self
    }

    fn from_draft(id: TransactionId, draft: TransactionDraft) -> Self {
        Self {
            id,
            title: draft.title,
            counterparty: draft.counterparty,
            amount_cents: draft.amount_cents,
            direction: draft.direction,
            status: draft.status,
            date: draft.date,
            note: draft.note,
        }
    }
}

impl Searchable for Transaction {
    type Filter = TransactionFilter;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.counterparty.as_str()]
    }

    fn matches_filter(&self, filter: &TransactionFilter) -> bool {
        match filter {
            TransactionFilter::All => true,
            TransactionFilter::Incoming => self.direction == TransactionDirection::Incoming,
            TransactionFilter::Outgoing => self.direction == TransactionDirection::Outgoing,
            TransactionFilter::Pending => self.status == TransactionStatus::Pending,
        }
    }

    fn sort_label(&self) -> &str {
        &self.title
    }
}

impl Record for CalendarEvent {
    type Id = EventId;
    type Draft = CalendarEventDraft;
    const KIND: &'static str = "event";

    fn id(&self) -> EventId {
        self.id
    }

    fn with_id(mut self, id: EventId) -> Self {
        self.id = id;
        self
    }

    fn from_draft(id: EventId, draft: CalendarEventDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            location: draft.location,
            attendees: draft.attendees,
            color: draft.color,
            event_type: draft.event_type,
            priority: draft.priority,
            category: draft.category,
        }
    }
}

impl Searchable for CalendarEvent {
    type Filter = EventFilter;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.title.as_str(),
            self.description.as_str(),
            self.location.as_str(),
        ];
        if let Some(category) = &self.category {
            fields.push(category.as_str());
        }
        fields
    }

    fn matches_filter(&self, filter: &EventFilter) -> bool {
        match filter {
            EventFilter::All => true,
            EventFilter::Kind(kind) => self.event_type == Some(*kind),
            EventFilter::HighPriority => self.priority == Some(EventPriority::High),
        }
    }

    fn sort_label(&self) -> &str {
        &self.title
    }
}

/// Writes a calendar date as a midnight-UTC ISO timestamp and reads either a
/// timestamp or a bare `YYYY-MM-DD` back into a [`Date`].
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use time::Date;

    use crate::validation::{format_iso_timestamp, parse_iso_date};

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_iso_timestamp(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_iso_date(&raw).map_err(|_| de::Error::custom(format!("invalid ISO date {raw:?}")))
    }
}
