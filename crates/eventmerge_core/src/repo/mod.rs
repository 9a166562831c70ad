//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/engine orchestration.
//!
//! # Invariants
//! - Write paths call `EventDraft::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Deleting a missing event reports `EventNotFound` rather than a silent
//!   no-op; absent reads return `Ok(None)`.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::event::{EventId, EventValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod event_repo;
pub mod merge_store;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for event/user persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(EventValidationError),
    Db(DbError),
    EventNotFound(EventId),
    /// Caller input rejected before reaching SQL.
    InvalidInput(String),
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Required columns per table, checked before a repository is handed out.
pub(crate) const USERS_COLUMNS: (&str, &[&str]) = ("users", &["uuid", "name", "created_at"]);
pub(crate) const EVENTS_COLUMNS: (&str, &[&str]) = (
    "events",
    &[
        "uuid",
        "title",
        "description",
        "status",
        "start_time",
        "end_time",
        "created_at",
        "updated_at",
    ],
);
pub(crate) const EVENT_INVITEES_COLUMNS: (&str, &[&str]) =
    ("event_invitees", &["event_uuid", "user_uuid"]);

/// Verifies schema version plus the given tables and columns.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[(&'static str, &'static [&'static str])],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
