//! Event domain model.
//!
//! # Responsibility
//! - Define persisted events and unsaved event drafts.
//! - Own status priority rules used when events are combined.
//!
//! # Invariants
//! - `title` is non-empty after trim.
//! - `end_time > start_time` (strict; zero-length events are invalid).
//! - `invitees` holds each user id at most once.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for events.
pub type EventId = Uuid;

/// Upper bound for caller-supplied event titles, counted in chars.
pub const MAX_TITLE_CHARS: usize = 255;

/// Event lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl EventStatus {
    /// Merge priority: `InProgress (3) > Todo (2) > Completed (1)`.
    pub fn priority(self) -> u8 {
        match self {
            Self::InProgress => 3,
            Self::Todo => 2,
            Self::Completed => 1,
        }
    }

    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    /// Parses the storage representation, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TODO" => Some(Self::Todo),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to an invited user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitee {
    pub id: UserId,
    pub name: String,
}

/// Validation errors for event records and drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EmptyTitle,
    TitleTooLong { chars: usize, max: usize },
    InvalidTimeRange { start_time: i64, end_time: i64 },
    DuplicateInvitee(UserId),
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "event title must not be blank"),
            Self::TitleTooLong { chars, max } => {
                write!(f, "event title has {chars} chars; at most {max} allowed")
            }
            Self::InvalidTimeRange {
                start_time,
                end_time,
            } => write!(
                f,
                "event end_time ({end_time}) must be after start_time ({start_time})"
            ),
            Self::DuplicateInvitee(id) => write!(f, "duplicate invitee: {id}"),
        }
    }
}

impl Error for EventValidationError {}

/// Persisted event record with its invitees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub status: EventStatus,
    /// Unix epoch milliseconds.
    pub start_time: i64,
    /// Unix epoch milliseconds. Strictly greater than `start_time`.
    pub end_time: i64,
    /// Epoch ms, assigned by storage on insert.
    pub created_at: i64,
    /// Epoch ms, assigned by storage on insert/update.
    pub updated_at: i64,
    pub invitees: Vec<Invitee>,
}

impl Event {
    /// Checks the record invariants listed in the module docs.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_fields(&self.title, self.start_time, self.end_time, &self.invitees)
    }

    /// Returns whether the interval has positive length.
    pub fn has_valid_span(&self) -> bool {
        self.end_time > self.start_time
    }
}

/// Unsaved event. Storage assigns `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: EventStatus,
    pub start_time: i64,
    pub end_time: i64,
    pub invitees: Vec<Invitee>,
}

impl EventDraft {
    /// Creates a `Todo` draft without description or invitees.
    pub fn new(title: impl Into<String>, start_time: i64, end_time: i64) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: EventStatus::Todo,
            start_time,
            end_time,
            invitees: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_invitee(mut self, invitee: Invitee) -> Self {
        self.invitees.push(invitee);
        self
    }

    /// Checks the record invariants listed in the module docs.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_fields(&self.title, self.start_time, self.end_time, &self.invitees)
    }

    /// Input rules for caller-authored drafts on top of `validate()`.
    ///
    /// Synthesized drafts skip this check: a merged title may legitimately
    /// exceed `MAX_TITLE_CHARS`.
    pub fn validate_input(&self) -> Result<(), EventValidationError> {
        let chars = self.title.chars().count();
        if chars > MAX_TITLE_CHARS {
            return Err(EventValidationError::TitleTooLong {
                chars,
                max: MAX_TITLE_CHARS,
            });
        }
        self.validate()
    }

    /// Materializes the draft into a record with the given identity.
    pub fn into_event(self, id: EventId, created_at: i64, updated_at: i64) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            start_time: self.start_time,
            end_time: self.end_time,
            created_at,
            updated_at,
            invitees: self.invitees,
        }
    }
}

/// Generates a fresh event identifier.
pub fn new_event_id() -> EventId {
    Uuid::new_v4()
}

fn validate_fields(
    title: &str,
    start_time: i64,
    end_time: i64,
    invitees: &[Invitee],
) -> Result<(), EventValidationError> {
    if title.trim().is_empty() {
        return Err(EventValidationError::EmptyTitle);
    }
    if end_time <= start_time {
        return Err(EventValidationError::InvalidTimeRange {
            start_time,
            end_time,
        });
    }

    let mut seen = HashSet::with_capacity(invitees.len());
    for invitee in invitees {
        if !seen.insert(invitee.id) {
            return Err(EventValidationError::DuplicateInvitee(invitee.id));
        }
    }

    Ok(())
}
