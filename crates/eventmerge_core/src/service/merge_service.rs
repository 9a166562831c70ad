//! Merge use-case service.
//!
//! # Responsibility
//! - Replace each connected cluster of a user's overlapping events with one
//!   synthesized event, atomically.
//! - Report what was merged, and offer a read-only overlap report.
//!
//! # Invariants
//! - Storage is mutated only when at least one group has two or more members.
//! - All deletions and insertions of one run happen in one `run_atomically`
//!   call; a failure leaves every event untouched.
//! - The i-th merged event summary corresponds to the i-th overlap group.
//! - Concurrent runs for one user cannot both apply: the store rejects a
//!   delete of an already-replaced event and the loser rolls back.

use crate::merge::{group_overlapping, OverlapGroup};
use crate::model::event::{Event, EventDraft, EventId, EventStatus};
use crate::model::user::UserId;
use crate::repo::merge_store::{EventWriter, MergeStore};
use crate::repo::RepoError;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Value of `MergeResult::operation` for every successful run.
pub const MERGE_COMPLETED: &str = "merge_completed";

/// Service error for merge use-cases.
#[derive(Debug)]
pub enum MergeServiceError {
    /// Requested user does not exist.
    UserNotFound(UserId),
    /// Loading or the atomic apply step failed; nothing was changed.
    StorageFailure(RepoError),
}

impl Display for MergeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::StorageFailure(err) => write!(f, "merge storage failure: {err}"),
        }
    }
}

impl Error for MergeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UserNotFound(_) => None,
            Self::StorageFailure(err) => Some(err),
        }
    }
}

impl From<RepoError> for MergeServiceError {
    fn from(value: RepoError) -> Self {
        Self::StorageFailure(value)
    }
}

/// Counts describing one merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    pub original_event_count: usize,
    /// Members across all groups of two or more.
    pub overlapping_event_count: usize,
    pub overlapping_groups: usize,
    pub merged_event_count: usize,
    /// `original - overlapping + merged`.
    pub remaining_event_count: usize,
}

impl MergeSummary {
    /// Summary for a run that changed nothing.
    pub fn unchanged(original_event_count: usize) -> Self {
        Self {
            original_event_count,
            overlapping_event_count: 0,
            overlapping_groups: 0,
            merged_event_count: 0,
            remaining_event_count: original_event_count,
        }
    }

    fn from_groups(original_event_count: usize, groups: &[OverlapGroup]) -> Self {
        let overlapping_event_count = groups.iter().map(|group| group.members.len()).sum();
        let merged_event_count = groups.len();
        Self {
            original_event_count,
            overlapping_event_count,
            overlapping_groups: groups.len(),
            merged_event_count,
            remaining_event_count: original_event_count - overlapping_event_count
                + merged_event_count,
        }
    }
}

/// Detail record for one persisted merged event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedEventSummary {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub status: EventStatus,
    pub start_time: i64,
    pub end_time: i64,
    pub invitee_count: usize,
    /// Replaced event ids in group member order.
    pub original_event_ids: Vec<EventId>,
}

impl MergedEventSummary {
    fn new(saved: &Event, group: &OverlapGroup) -> Self {
        Self {
            id: saved.id,
            title: saved.title.clone(),
            description: saved.description.clone(),
            status: saved.status,
            start_time: saved.start_time,
            end_time: saved.end_time,
            invitee_count: saved.invitees.len(),
            original_event_ids: group.members.iter().map(|event| event.id).collect(),
        }
    }
}

/// Result envelope returned by `merge_all_events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub user_id: UserId,
    /// Always `MERGE_COMPLETED`.
    pub operation: String,
    pub summary: MergeSummary,
    pub merged_events: Vec<MergedEventSummary>,
}

impl MergeResult {
    fn completed(
        user_id: UserId,
        summary: MergeSummary,
        merged_events: Vec<MergedEventSummary>,
    ) -> Self {
        Self {
            user_id,
            operation: MERGE_COMPLETED.to_string(),
            summary,
            merged_events,
        }
    }
}

/// Overlap findings for one user; produced without mutating storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverlapReport {
    pub user_id: UserId,
    pub user_name: String,
    pub event_count: usize,
    pub overlapping_groups: usize,
    pub overlapping_event_count: usize,
    /// Member ids per group, in the order `merge_all_events` would use.
    pub groups: Vec<Vec<EventId>>,
}

/// Merge service facade over a `MergeStore`.
pub struct MergeService<S: MergeStore> {
    store: S,
}

impl<S: MergeStore> MergeService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Merges every connected cluster of overlapping events for one user.
    ///
    /// # Errors
    /// - `UserNotFound` when `user_id` does not exist (no mutation).
    /// - `StorageFailure` when loading or the atomic apply fails (no mutation).
    pub fn merge_all_events(&mut self, user_id: UserId) -> Result<MergeResult, MergeServiceError> {
        let started_at = Instant::now();
        info!("event=merge_events module=service status=start user_id={user_id}");

        let result = self.merge_all_events_inner(user_id);
        match &result {
            Ok(merged) => info!(
                "event=merge_events module=service status=ok user_id={} duration_ms={} original={} groups={} remaining={}",
                user_id,
                started_at.elapsed().as_millis(),
                merged.summary.original_event_count,
                merged.summary.overlapping_groups,
                merged.summary.remaining_event_count
            ),
            Err(err) => error!(
                "event=merge_events module=service status=error user_id={} duration_ms={} error_code={} error={}",
                user_id,
                started_at.elapsed().as_millis(),
                error_code(err),
                err
            ),
        }
        result
    }

    /// Lists users whose events contain at least one overlap group.
    pub fn overlap_report(&self) -> Result<Vec<UserOverlapReport>, MergeServiceError> {
        let users = self.store.list_users_with_events()?;
        let reports = users
            .into_iter()
            .filter_map(|snapshot| {
                let groups = group_overlapping(&snapshot.events);
                if groups.is_empty() {
                    return None;
                }
                Some(UserOverlapReport {
                    user_id: snapshot.user.id,
                    user_name: snapshot.user.name,
                    event_count: snapshot.events.len(),
                    overlapping_groups: groups.len(),
                    overlapping_event_count: groups.iter().map(|group| group.members.len()).sum(),
                    groups: groups
                        .iter()
                        .map(|group| group.members.iter().map(|event| event.id).collect())
                        .collect(),
                })
            })
            .collect::<Vec<_>>();

        info!(
            "event=overlap_report module=service status=ok users_with_overlaps={}",
            reports.len()
        );
        Ok(reports)
    }

    fn merge_all_events_inner(&mut self, user_id: UserId) -> Result<MergeResult, MergeServiceError> {
        let snapshot = self
            .store
            .find_user_with_events(user_id)?
            .ok_or(MergeServiceError::UserNotFound(user_id))?;
        let original_event_count = snapshot.events.len();

        if original_event_count <= 1 {
            return Ok(MergeResult::completed(
                user_id,
                MergeSummary::unchanged(original_event_count),
                Vec::new(),
            ));
        }

        let groups = group_overlapping(&snapshot.events);
        if groups.is_empty() {
            return Ok(MergeResult::completed(
                user_id,
                MergeSummary::unchanged(original_event_count),
                Vec::new(),
            ));
        }

        let replaced: Vec<Event> = groups
            .iter()
            .flat_map(|group| group.members.iter().cloned())
            .collect();
        let drafts: Vec<EventDraft> = groups
            .iter()
            .map(|group| group.synthesized.clone())
            .collect();

        let saved = self.store.run_atomically(|writer| {
            writer.delete_many(&replaced)?;
            writer.create_and_save_many(&drafts)
        })?;

        let merged_events = saved
            .iter()
            .zip(&groups)
            .map(|(event, group)| MergedEventSummary::new(event, group))
            .collect();

        Ok(MergeResult::completed(
            user_id,
            MergeSummary::from_groups(original_event_count, &groups),
            merged_events,
        ))
    }
}

fn error_code(err: &MergeServiceError) -> &'static str {
    match err {
        MergeServiceError::UserNotFound(_) => "user_not_found",
        MergeServiceError::StorageFailure(_) => "storage_failure",
    }
}
