//! Storage contract consumed by the merge coordinator.
//!
//! # Responsibility
//! - Load a user's event snapshot for merging.
//! - Run bulk delete + bulk insert as one atomic unit of work.
//!
//! # Invariants
//! - `run_atomically` commits only when `work` returns `Ok`; any error rolls
//!   back every mutation performed through the writer handle.
//! - The apply transaction is `IMMEDIATE`, so concurrent applies against the
//!   same database are serialized at `BEGIN`.
//! - `delete_many` fails with `EventNotFound` when any event is already gone,
//!   which rejects merges computed from a stale snapshot.

use crate::model::event::{Event, EventDraft};
use crate::model::user::{UserId, UserWithEvents};
use crate::repo::event_repo::{delete_event_row, insert_event};
use crate::repo::user_repo::{list_all_users_with_events, load_user_with_events};
use crate::repo::{
    ensure_connection_ready, RepoResult, EVENTS_COLUMNS, EVENT_INVITEES_COLUMNS, USERS_COLUMNS,
};
use log::{debug, warn};
use rusqlite::{Connection, TransactionBehavior};

/// Write handle available inside one atomic unit of work.
pub trait EventWriter {
    /// Deletes every given event. Fails if any of them no longer exists.
    fn delete_many(&self, events: &[Event]) -> RepoResult<()>;
    /// Persists every draft, returning stored records in input order.
    fn create_and_save_many(&self, drafts: &[EventDraft]) -> RepoResult<Vec<Event>>;
}

/// Read + transactional-apply contract required by the merge coordinator.
pub trait MergeStore {
    /// Loads one user with invited events and their invitees.
    fn find_user_with_events(&self, user_id: UserId) -> RepoResult<Option<UserWithEvents>>;
    /// Loads every user with invited events.
    fn list_users_with_events(&self) -> RepoResult<Vec<UserWithEvents>>;
    /// Runs `work` inside one transaction; commits only on `Ok`.
    fn run_atomically<T, F>(&mut self, work: F) -> RepoResult<T>
    where
        F: FnOnce(&dyn EventWriter) -> RepoResult<T>;
}

/// SQLite-backed merge store.
pub struct SqliteMergeStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteMergeStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[USERS_COLUMNS, EVENTS_COLUMNS, EVENT_INVITEES_COLUMNS])?;
        Ok(Self { conn })
    }
}

impl MergeStore for SqliteMergeStore<'_> {
    fn find_user_with_events(&self, user_id: UserId) -> RepoResult<Option<UserWithEvents>> {
        load_user_with_events(self.conn, user_id)
    }

    fn list_users_with_events(&self) -> RepoResult<Vec<UserWithEvents>> {
        list_all_users_with_events(self.conn)
    }

    fn run_atomically<T, F>(&mut self, work: F) -> RepoResult<T>
    where
        F: FnOnce(&dyn EventWriter) -> RepoResult<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let writer = SqliteEventWriter { conn: &tx };
        match work(&writer) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=atomic_apply module=repo status=error error_code=rollback_failed error={rollback_err}"
                    );
                }
                warn!("event=atomic_apply module=repo status=rolled_back error={err}");
                Err(err)
            }
        }
    }
}

struct SqliteEventWriter<'tx> {
    conn: &'tx Connection,
}

impl EventWriter for SqliteEventWriter<'_> {
    fn delete_many(&self, events: &[Event]) -> RepoResult<()> {
        for event in events {
            delete_event_row(self.conn, event.id)?;
        }
        debug!(
            "event=events_delete_many module=repo status=ok count={}",
            events.len()
        );
        Ok(())
    }

    fn create_and_save_many(&self, drafts: &[EventDraft]) -> RepoResult<Vec<Event>> {
        let mut saved = Vec::with_capacity(drafts.len());
        for draft in drafts {
            saved.push(insert_event(self.conn, draft)?);
        }
        debug!(
            "event=events_create_many module=repo status=ok count={}",
            drafts.len()
        );
        Ok(saved)
    }
}
