//! User commands.

use super::{open, print_json};
use anyhow::{anyhow, Result};
use clap::Subcommand;
use eventmerge_core::{SqliteUserRepository, UserRepository};
use log::info;
use std::path::Path;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user
    Add {
        /// Display name
        name: String,
    },
    /// Show a user with every event they are invited to
    Show {
        /// User id
        id: Uuid,
    },
    /// List every user with their events, oldest user first
    List,
}

pub fn run(db: &Path, action: UserAction) -> Result<()> {
    let conn = open(db)?;
    let users = SqliteUserRepository::try_new(&conn)?;

    match action {
        UserAction::Add { name } => {
            let user = users.create_user(&name)?;
            info!("event=cli_user_add module=cli status=ok user_id={}", user.id);
            print_json(&user)
        }
        UserAction::Show { id } => {
            let user = users
                .find_user_with_events(id)?
                .ok_or_else(|| anyhow!("user not found: {id}"))?;
            print_json(&user)
        }
        UserAction::List => print_json(&users.list_users_with_events()?),
    }
}
