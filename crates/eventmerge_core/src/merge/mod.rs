//! Overlap merge engine.
//!
//! # Responsibility
//! - Decide whether two events overlap (`overlap`).
//! - Cluster a user's events into connected overlap groups (`grouper`).
//! - Synthesize one replacement draft per group (`synthesize`).
//!
//! # Invariants
//! - Everything here is pure and storage-agnostic; persistence and atomic
//!   replacement live in `service::merge_service`.
//! - Inputs satisfy `end_time > start_time`; the store read path rejects
//!   anything else before it reaches this module.

pub mod grouper;
pub mod overlap;
pub mod synthesize;

pub use grouper::{group_overlapping, OverlapGroup};
pub use overlap::overlaps;
pub use synthesize::merge_group;
