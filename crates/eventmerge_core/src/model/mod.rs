//! Domain model for scheduled events and their invitees.
//!
//! # Responsibility
//! - Define canonical data structures used by the merge engine and stores.
//! - Keep validation rules next to the records they protect.
//!
//! # Invariants
//! - Every persisted event and user is identified by a stable UUID.
//! - Persisted events always satisfy `end_time > start_time`.

pub mod event;
pub mod user;
