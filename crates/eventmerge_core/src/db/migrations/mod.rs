//! Schema upgrades for the event store.
//!
//! Each entry in `MIGRATIONS` moves the database from `version - 1` to
//! `version`. `apply_migrations` runs every step above the stored
//! `user_version` inside one transaction, so a failed upgrade leaves the file
//! at its previous version. Steps are append-only: shipped SQL never changes.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

struct SchemaStep {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Schema version this build writes and expects.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `Sqlite` when a step fails; nothing from this call is kept.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let target = latest_version();

    if stored > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: target,
        });
    }
    if stored == target {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in MIGRATIONS.iter().filter(|step| step.version > stored) {
        apply_step(&tx, step)?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={stored} to_version={target}");
    Ok(())
}

fn apply_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    // PRAGMA does not accept bound parameters.
    tx.execute_batch(&format!("PRAGMA user_version = {};", step.version))?;
    debug!("event=db_migrate_step module=db status=ok version={}", step.version);
    Ok(())
}
