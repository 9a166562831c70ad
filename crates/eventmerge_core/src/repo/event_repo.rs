//! Event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/delete APIs over canonical `events` storage.
//! - Own invitee link persistence in `event_invitees`.
//! - Expose row helpers reused by the merge store inside transactions.
//!
//! # Invariants
//! - Write paths call `EventDraft::validate()` before SQL mutations.
//! - Read paths call `Event::validate()` on every loaded row.
//! - Invitees are always returned sorted by `name ASC, uuid ASC`.

use crate::model::event::{new_event_id, Event, EventDraft, EventId, EventStatus, Invitee};
use crate::repo::{
    ensure_connection_ready, RepoError, RepoResult, EVENTS_COLUMNS, EVENT_INVITEES_COLUMNS,
    USERS_COLUMNS,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

pub(crate) const EVENT_SELECT_SQL: &str = "SELECT
    e.uuid,
    e.title,
    e.description,
    e.status,
    e.start_time,
    e.end_time,
    e.created_at,
    e.updated_at
FROM events e";

/// Repository interface for event CRUD operations.
pub trait EventRepository {
    /// Persists a draft and returns the stored record.
    fn create_event(&self, draft: &EventDraft) -> RepoResult<Event>;
    /// Loads one event with invitees.
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Hard-deletes one event; invitee links cascade.
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[USERS_COLUMNS, EVENTS_COLUMNS, EVENT_INVITEES_COLUMNS])?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, draft: &EventDraft) -> RepoResult<Event> {
        insert_event(self.conn, draft)
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        load_event(self.conn, id)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        delete_event_row(self.conn, id)
    }
}

/// Inserts one event plus invitee links on the given connection.
///
/// Callers wanting atomicity across several inserts pass a transaction.
pub(crate) fn insert_event(conn: &Connection, draft: &EventDraft) -> RepoResult<Event> {
    draft.validate()?;

    let id = new_event_id();
    let id_text = id.to_string();
    let (created_at, updated_at): (i64, i64) = conn.query_row(
        "INSERT INTO events (
            uuid,
            title,
            description,
            status,
            start_time,
            end_time
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING created_at, updated_at;",
        params![
            id_text.as_str(),
            draft.title.as_str(),
            draft.description.as_deref(),
            draft.status.as_str(),
            draft.start_time,
            draft.end_time,
        ],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    for invitee in &draft.invitees {
        conn.execute(
            "INSERT INTO event_invitees (event_uuid, user_uuid) VALUES (?1, ?2);",
            params![id_text.as_str(), invitee.id.to_string()],
        )?;
    }

    let mut event = draft.clone().into_event(id, created_at, updated_at);
    sort_invitees(&mut event.invitees);
    Ok(event)
}

/// Loads one event with invitees on the given connection.
pub(crate) fn load_event(conn: &Connection, id: EventId) -> RepoResult<Option<Event>> {
    let mut stmt = conn.prepare(&format!("{EVENT_SELECT_SQL} WHERE e.uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_event_row(conn, row)?));
    }
    Ok(None)
}

/// Deletes one event row, reporting `EventNotFound` when nothing changed.
pub(crate) fn delete_event_row(conn: &Connection, id: EventId) -> RepoResult<()> {
    let changed = conn.execute("DELETE FROM events WHERE uuid = ?1;", [id.to_string()])?;
    if changed == 0 {
        return Err(RepoError::EventNotFound(id));
    }
    Ok(())
}

/// Converts one `EVENT_SELECT_SQL` row into a validated event.
pub(crate) fn parse_event_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Event> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "events.uuid")?;

    let status_text: String = row.get("status")?;
    let status = EventStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in events.status"))
    })?;

    let event = Event {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        invitees: load_invitees(conn, &uuid_text)?,
    };
    event.validate().map_err(|err| {
        RepoError::InvalidData(format!("event {id} violates model invariants: {err}"))
    })?;
    Ok(event)
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn load_invitees(conn: &Connection, event_uuid: &str) -> RepoResult<Vec<Invitee>> {
    let mut stmt = conn.prepare(
        "SELECT u.uuid, u.name
         FROM event_invitees ei
         INNER JOIN users u ON u.uuid = ei.user_uuid
         WHERE ei.event_uuid = ?1
         ORDER BY u.name ASC, u.uuid ASC;",
    )?;
    let mut rows = stmt.query([event_uuid])?;
    let mut invitees = Vec::new();
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get(0)?;
        invitees.push(Invitee {
            id: parse_uuid(&uuid_text, "users.uuid")?,
            name: row.get(1)?,
        });
    }
    Ok(invitees)
}

fn sort_invitees(invitees: &mut [Invitee]) {
    invitees.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}
