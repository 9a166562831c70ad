//! Core domain logic for event overlap merging.
//! This crate is the single source of truth for merge invariants.

pub mod db;
pub mod logging;
pub mod merge;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use merge::{group_overlapping, merge_group, overlaps, OverlapGroup};
pub use model::event::{Event, EventDraft, EventId, EventStatus, EventValidationError, Invitee};
pub use model::user::{User, UserId, UserWithEvents};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::merge_store::{EventWriter, MergeStore, SqliteMergeStore};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::event_service::{CreateEventRequest, EventService, EventServiceError};
pub use service::merge_service::{
    MergeResult, MergeService, MergeServiceError, MergeSummary, MergedEventSummary,
    UserOverlapReport, MERGE_COMPLETED,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
