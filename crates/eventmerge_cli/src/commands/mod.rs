pub mod event;
pub mod merge;
pub mod user;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

/// Opens the database at `path`, applying migrations.
pub fn open(path: &Path) -> Result<Connection> {
    eventmerge_core::db::open_db(path)
        .with_context(|| format!("failed to open database `{}`", path.display()))
}

/// Prints `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
