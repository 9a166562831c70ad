//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get APIs over `users`.
//! - Load users together with every event they are invited to.
//!
//! # Invariants
//! - User events are ordered by `start_time ASC, created_at ASC, uuid ASC`.
//! - User names are trimmed and non-empty.

use crate::model::event::Event;
use crate::model::user::{User, UserId, UserWithEvents};
use crate::repo::event_repo::{parse_event_row, parse_uuid, EVENT_SELECT_SQL};
use crate::repo::{
    ensure_connection_ready, RepoError, RepoResult, EVENTS_COLUMNS, EVENT_INVITEES_COLUMNS,
    USERS_COLUMNS,
};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const USER_SELECT_SQL: &str = "SELECT uuid, name, created_at FROM users";

/// Repository interface for user operations.
pub trait UserRepository {
    /// Creates one user and returns the stored record.
    fn create_user(&self, name: &str) -> RepoResult<User>;
    /// Loads one user by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Loads the subset of `ids` that exist, in `ids` order.
    fn find_users(&self, ids: &[UserId]) -> RepoResult<Vec<User>>;
    /// Loads one user with invited events and their invitees.
    fn find_user_with_events(&self, id: UserId) -> RepoResult<Option<UserWithEvents>>;
    /// Loads every user with invited events, ordered by `created_at, uuid`.
    fn list_users_with_events(&self) -> RepoResult<Vec<UserWithEvents>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[USERS_COLUMNS, EVENTS_COLUMNS, EVENT_INVITEES_COLUMNS])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, name: &str) -> RepoResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepoError::InvalidInput(
                "user name must not be blank".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        let created_at: i64 = self.conn.query_row(
            "INSERT INTO users (uuid, name) VALUES (?1, ?2) RETURNING created_at;",
            params![id.to_string(), name],
            |row| row.get(0),
        )?;

        Ok(User {
            id,
            name: name.to_string(),
            created_at,
        })
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        load_user(self.conn, id)
    }

    fn find_users(&self, ids: &[UserId]) -> RepoResult<Vec<User>> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(user) = load_user(self.conn, *id)? {
                users.push(user);
            }
        }
        Ok(users)
    }

    fn find_user_with_events(&self, id: UserId) -> RepoResult<Option<UserWithEvents>> {
        load_user_with_events(self.conn, id)
    }

    fn list_users_with_events(&self) -> RepoResult<Vec<UserWithEvents>> {
        list_all_users_with_events(self.conn)
    }
}

pub(crate) fn load_user_with_events(
    conn: &Connection,
    id: UserId,
) -> RepoResult<Option<UserWithEvents>> {
    let Some(user) = load_user(conn, id)? else {
        return Ok(None);
    };
    let events = load_events_for_user(conn, &user.id.to_string())?;
    Ok(Some(UserWithEvents { user, events }))
}

pub(crate) fn list_all_users_with_events(conn: &Connection) -> RepoResult<Vec<UserWithEvents>> {
    let mut stmt = conn.prepare(&format!(
        "{USER_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"
    ))?;
    let mut rows = stmt.query([])?;
    let mut users = Vec::new();
    while let Some(row) = rows.next()? {
        let user = parse_user_row(row)?;
        let events = load_events_for_user(conn, &user.id.to_string())?;
        users.push(UserWithEvents { user, events });
    }
    Ok(users)
}

fn load_user(conn: &Connection, id: UserId) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_user_row(row)?));
    }
    Ok(None)
}

fn load_events_for_user(conn: &Connection, user_uuid: &str) -> RepoResult<Vec<Event>> {
    let mut stmt = conn.prepare(&format!(
        "{EVENT_SELECT_SQL}
         INNER JOIN event_invitees ei ON ei.event_uuid = e.uuid
         WHERE ei.user_uuid = ?1
         ORDER BY e.start_time ASC, e.created_at ASC, e.uuid ASC;"
    ))?;
    let mut rows = stmt.query([user_uuid])?;
    let mut events = Vec::new();
    while let Some(row) = rows.next()? {
        events.push(parse_event_row(conn, row)?);
    }
    Ok(events)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    Ok(User {
        id: parse_uuid(&uuid_text, "users.uuid")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}
