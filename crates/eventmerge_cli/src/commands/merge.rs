//! Merge and overlap report commands.

use super::{open, print_json};
use anyhow::Result;
use eventmerge_core::{MergeService, SqliteMergeStore};
use std::path::Path;
use uuid::Uuid;

pub fn run_merge(db: &Path, user_id: Uuid) -> Result<()> {
    let mut conn = open(db)?;
    let mut service = MergeService::new(SqliteMergeStore::try_new(&mut conn)?);
    let result = service.merge_all_events(user_id)?;
    print_json(&result)
}

pub fn run_overlaps(db: &Path) -> Result<()> {
    let mut conn = open(db)?;
    let service = MergeService::new(SqliteMergeStore::try_new(&mut conn)?);
    print_json(&service.overlap_report()?)
}
