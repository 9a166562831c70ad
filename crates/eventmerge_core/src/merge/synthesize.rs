//! Attribute combination for one overlap group.
//!
//! Rules, applied to members in start-time order:
//! - `title`: member titles joined with `" + "`.
//! - `description`: `"Event {n}: {description}"` per member (1-based,
//!   `"No description"` when missing or empty), joined by a `---` line.
//! - `status`: highest merge priority; the first member wins ties.
//! - span: earliest start to latest end.
//! - `invitees`: union by user id, first occurrence kept.

use crate::model::event::{Event, EventDraft, EventStatus, Invitee};
use std::collections::HashSet;

const TITLE_SEPARATOR: &str = " + ";
const DESCRIPTION_SEPARATOR: &str = "\n---\n";
const MISSING_DESCRIPTION: &str = "No description";

/// Synthesizes the unsaved replacement for a group of events.
pub fn merge_group(members: &[Event]) -> EventDraft {
    EventDraft {
        title: merged_title(members),
        description: Some(merged_description(members)),
        status: merged_status(members),
        start_time: members
            .iter()
            .map(|event| event.start_time)
            .min()
            .unwrap_or_default(),
        end_time: members
            .iter()
            .map(|event| event.end_time)
            .max()
            .unwrap_or_default(),
        invitees: merged_invitees(members),
    }
}

fn merged_title(members: &[Event]) -> String {
    members
        .iter()
        .map(|event| event.title.as_str())
        .collect::<Vec<_>>()
        .join(TITLE_SEPARATOR)
}

fn merged_description(members: &[Event]) -> String {
    members
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let text = event
                .description
                .as_deref()
                .filter(|value| !value.is_empty())
                .unwrap_or(MISSING_DESCRIPTION);
            format!("Event {}: {text}", index + 1)
        })
        .collect::<Vec<_>>()
        .join(DESCRIPTION_SEPARATOR)
}

fn merged_status(members: &[Event]) -> EventStatus {
    members
        .iter()
        .fold(EventStatus::Completed, |best, event| {
            if event.status.priority() > best.priority() {
                event.status
            } else {
                best
            }
        })
}

fn merged_invitees(members: &[Event]) -> Vec<Invitee> {
    let mut seen = HashSet::new();
    members
        .iter()
        .flat_map(|event| event.invitees.iter())
        .filter(|invitee| seen.insert(invitee.id))
        .cloned()
        .collect()
}
