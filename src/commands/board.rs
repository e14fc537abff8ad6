//! Board commands shared by the one-shot CLI and the interactive shell.
//!
//! One-shot invocations open the configured store, run a single command and
//! save right away when the board has unsaved changes. The shell runs the
//! same [`BoardCommand`]s against one long-lived store and leaves saving to
//! the snapshot scheduler.

use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::StoreError;
use crate::libs::messages::Message;
use crate::libs::store::{SaveOutcome, TaskStore};
use crate::libs::task::TaskId;
use crate::libs::view::View;
use crate::{msg_error_anyhow, msg_info, msg_print, msg_success};
use anyhow::Result;
use clap::Subcommand;

#[derive(Debug, Clone, Subcommand)]
pub enum BoardCommand {
    #[command(about = "Show every column and its tasks")]
    List {
        /// Print the board as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    #[command(about = "Create a task at the bottom of a column")]
    Add {
        /// Column key; created if it does not exist yet
        column: String,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        #[arg(short, long, num_args = 1..)]
        description: Vec<String>,
    },
    #[command(about = "Show a single task")]
    Show { id: String },
    #[command(about = "Change the title and description of a task")]
    Edit {
        id: String,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// New description; the current one is kept when omitted
        #[arg(short, long, num_args = 1..)]
        description: Option<Vec<String>>,
    },
    #[command(about = "Move a task to a position in a column")]
    Move {
        id: String,
        column: String,
        /// Target position; clamped to the column, negative means top
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    #[command(about = "Delete a task")]
    Delete { id: String },
    #[command(about = "Delete every task in a column")]
    Empty { column: String },
}

/// Runs a one-shot command against the configured snapshot file.
pub fn cmd(command: BoardCommand) -> Result<()> {
    run_in(&DataStorage::new(), command)
}

/// Runs a one-shot command with config and snapshot taken from `storage`.
///
/// The board is saved whenever it is dirty afterwards, including a freshly
/// seeded board after a read-only command, so ids printed by one call stay
/// valid for the next. A failing command still saves before its error is
/// returned.
pub fn run_in(storage: &DataStorage, command: BoardCommand) -> Result<()> {
    let store = Config::read_from(storage)?.store().open_store(storage)?;

    let result = execute(&store, command);

    if store.is_dirty() {
        save(&store)?;
    }
    result
}

/// Runs `command` against `store` and prints the result.
pub fn execute(store: &TaskStore, command: BoardCommand) -> Result<()> {
    match command {
        BoardCommand::List { json } => {
            let board = store.list_all();
            if json {
                let json = serde_json::to_string_pretty(&board)?;
                msg_print!(json);
            } else if board.columns.is_empty() {
                msg_info!(Message::BoardEmpty);
            } else {
                View::board(&board);
            }
        }
        BoardCommand::Add {
            column,
            title,
            description,
        } => {
            let task = store.add(&title.join(" "), &description.join(" "), &column);
            msg_success!(Message::TaskCreated {
                id: task.id.to_string(),
                column,
            });
        }
        BoardCommand::Show { id } => {
            let (task, placement) = store.locate(&TaskId::from(id)).map_err(not_found)?;
            View::task(&task, &placement);
        }
        BoardCommand::Edit { id, title, description } => {
            let id = TaskId::from(id);
            let description = description.map(|words| words.join(" "));
            store.edit(&id, &title.join(" "), description.as_deref()).map_err(not_found)?;
            msg_success!(Message::TaskUpdated(id.to_string()));
        }
        BoardCommand::Move { id, column, index } => {
            let id = TaskId::from(id);
            store.move_task(&id, &column, index).map_err(not_found)?;
            msg_success!(Message::TaskMoved {
                id: id.to_string(),
                column,
                index,
            });
        }
        BoardCommand::Delete { id } => {
            let id = TaskId::from(id);
            store.delete(&id).map_err(not_found)?;
            msg_success!(Message::TaskDeleted(id.to_string()));
        }
        BoardCommand::Empty { column } => match store.empty_column(&column) {
            0 => msg_info!(Message::ColumnAlreadyEmpty(column)),
            removed => msg_success!(Message::ColumnEmptied { column, removed }),
        },
    }
    Ok(())
}

/// Saves `store` now and reports what happened.
pub fn save(store: &TaskStore) -> Result<()> {
    match store.save() {
        Ok(SaveOutcome::Written { .. }) => {
            let path = store.snapshot_path().map(|path| path.display().to_string()).unwrap_or_default();
            msg_success!(Message::BoardSaved(path));
            Ok(())
        }
        Ok(SaveOutcome::Clean) => {
            msg_info!(Message::BoardUnchanged);
            Ok(())
        }
        Ok(SaveOutcome::Detached) => {
            msg_info!(Message::BoardNotPersisted);
            Ok(())
        }
        Err(e) => Err(msg_error_anyhow!(Message::BoardSaveFailed(e.to_string()))),
    }
}

fn not_found(err: StoreError) -> anyhow::Error {
    match err {
        StoreError::NotFound(id) => msg_error_anyhow!(Message::TaskNotFound(id.to_string())),
        other => other.into(),
    }
}
