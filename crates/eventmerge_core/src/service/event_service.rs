//! Event use-case service.
//!
//! # Responsibility
//! - Validate caller-authored event input before it reaches storage.
//! - Resolve invitee ids into user references.
//! - Provide create/get/delete entry points.
//!
//! # Invariants
//! - Every invitee id must be unique and refer to an existing user.
//! - Status defaults to `Todo` when the caller omits it.

use crate::model::event::{Event, EventDraft, EventId, EventStatus, EventValidationError};
use crate::model::user::{User, UserId};
use crate::repo::event_repo::EventRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for creating one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<EventStatus>,
    /// Epoch ms.
    pub start_time: i64,
    /// Epoch ms; must be after `start_time`.
    pub end_time: i64,
    pub invitee_ids: Vec<UserId>,
}

/// Service error for event use-cases.
#[derive(Debug)]
pub enum EventServiceError {
    /// Title, time range or invitee list is invalid.
    Validation(EventValidationError),
    /// One or more invitee ids do not refer to a user.
    InviteesNotFound(Vec<UserId>),
    /// Target event does not exist.
    EventNotFound(EventId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for EventServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InviteesNotFound(ids) => {
                let joined = ids
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "users not found: {joined}")
            }
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EventServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventValidationError> for EventServiceError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for EventServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EventNotFound(id) => Self::EventNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Event service facade over event and user repositories.
pub struct EventService<E: EventRepository, U: UserRepository> {
    events: E,
    users: U,
}

impl<E: EventRepository, U: UserRepository> EventService<E, U> {
    /// Creates a service using the provided repository implementations.
    pub fn new(events: E, users: U) -> Self {
        Self { events, users }
    }

    /// Validates and persists one event.
    ///
    /// # Errors
    /// - `Validation` for blank/oversized titles, non-positive spans or
    ///   duplicated invitee ids.
    /// - `InviteesNotFound` listing every unknown invitee id.
    pub fn create_event(&self, request: &CreateEventRequest) -> Result<Event, EventServiceError> {
        let mut draft = EventDraft::new(request.title.trim(), request.start_time, request.end_time)
            .with_status(request.status.unwrap_or_default());
        draft.description = request.description.clone();
        draft.validate_input()?;

        let mut seen = HashSet::with_capacity(request.invitee_ids.len());
        for id in &request.invitee_ids {
            if !seen.insert(*id) {
                return Err(EventValidationError::DuplicateInvitee(*id).into());
            }
        }

        let users = self.users.find_users(&request.invitee_ids)?;
        if users.len() != request.invitee_ids.len() {
            let found: HashSet<UserId> = users.iter().map(|user| user.id).collect();
            let missing = request
                .invitee_ids
                .iter()
                .filter(|id| !found.contains(id))
                .copied()
                .collect();
            return Err(EventServiceError::InviteesNotFound(missing));
        }
        draft.invitees = users.iter().map(User::as_invitee).collect();

        let event = self.events.create_event(&draft)?;
        info!(
            "event=event_create module=service status=ok event_id={} invitee_count={}",
            event.id,
            event.invitees.len()
        );
        Ok(event)
    }

    /// Gets one event by stable ID.
    pub fn get_event(&self, id: EventId) -> Result<Event, EventServiceError> {
        self.events
            .get_event(id)?
            .ok_or(EventServiceError::EventNotFound(id))
    }

    /// Hard-deletes one event by stable ID.
    pub fn delete_event(&self, id: EventId) -> Result<(), EventServiceError> {
        self.events.delete_event(id)?;
        info!("event=event_delete module=service status=ok event_id={id}");
        Ok(())
    }
}
