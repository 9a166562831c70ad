//! Event commands.

use super::{open, print_json};
use anyhow::Result;
use chrono::DateTime;
use clap::Subcommand;
use eventmerge_core::{
    CreateEventRequest, EventService, EventStatus, SqliteEventRepository, SqliteUserRepository,
};
use serde_json::json;
use std::path::Path;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum EventAction {
    /// Create an event
    Add {
        #[arg(long)]
        title: String,
        /// Start as RFC 3339, e.g. 2024-01-01T14:00:00Z
        #[arg(long, value_parser = parse_timestamp)]
        start: i64,
        /// End as RFC 3339; must be after start
        #[arg(long, value_parser = parse_timestamp)]
        end: i64,
        #[arg(long)]
        description: Option<String>,
        /// TODO, IN_PROGRESS or COMPLETED
        #[arg(long, value_parser = parse_status)]
        status: Option<EventStatus>,
        /// Invitee user id; repeat for several
        #[arg(long = "invitee")]
        invitees: Vec<Uuid>,
    },
    /// Show one event
    Show {
        /// Event id
        id: Uuid,
    },
    /// Delete one event
    Delete {
        /// Event id
        id: Uuid,
    },
}

pub fn run(db: &Path, action: EventAction) -> Result<()> {
    let conn = open(db)?;
    let service = EventService::new(
        SqliteEventRepository::try_new(&conn)?,
        SqliteUserRepository::try_new(&conn)?,
    );

    match action {
        EventAction::Add {
            title,
            start,
            end,
            description,
            status,
            invitees,
        } => {
            let event = service.create_event(&CreateEventRequest {
                title,
                description,
                status,
                start_time: start,
                end_time: end,
                invitee_ids: invitees,
            })?;
            print_json(&event)
        }
        EventAction::Show { id } => print_json(&service.get_event(id)?),
        EventAction::Delete { id } => {
            service.delete_event(id)?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

/// Parses an RFC 3339 timestamp into epoch milliseconds.
fn parse_timestamp(value: &str) -> Result<i64, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.timestamp_millis())
        .map_err(|err| format!("invalid RFC 3339 timestamp `{value}`: {err}"))
}

fn parse_status(value: &str) -> Result<EventStatus, String> {
    EventStatus::parse(value)
        .ok_or_else(|| format!("unknown status `{value}`; expected TODO|IN_PROGRESS|COMPLETED"))
}
