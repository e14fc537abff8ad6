//! Display implementation for kanbo messages.
//!
//! All user-facing text lives here, one arm per [`Message`] variant, so the
//! wording stays consistent across commands and the shell.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated { id, column } => format!("Task {} created in '{}'", id, column),
            Message::TaskUpdated(id) => format!("Task {} updated", id),
            Message::TaskMoved { id, column, index } => format!("Task {} moved to '{}' at position {}", id, column, index),
            Message::TaskDeleted(id) => format!("Task {} deleted", id),
            Message::TaskNotFound(id) => format!("Task {} not found", id),

            // === COLUMN MESSAGES ===
            Message::ColumnEmptied { column, removed } => format!("Column '{}' emptied ({} tasks removed)", column, removed),
            Message::ColumnAlreadyEmpty(column) => format!("Column '{}' is already empty", column),

            // === BOARD MESSAGES ===
            Message::BoardEmpty => "The board is empty".to_string(),
            Message::BoardSaved(path) => format!("Board saved to {}", path),
            Message::BoardUnchanged => "No changes to save".to_string(),
            Message::BoardNotPersisted => "Board has no snapshot file; nothing written".to_string(),
            Message::BoardSaveFailed(error) => format!("Failed to save board: {}", error),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigParseError => "Failed to parse configuration file".to_string(),
            Message::ConfigModuleStore => "Task store settings".to_string(),
            Message::PromptSnapshotFile => "Snapshot file".to_string(),
            Message::PromptSaveInterval => "Save interval (seconds)".to_string(),
            Message::PromptSeed => "Board to start with when no snapshot exists".to_string(),

            // === SHELL MESSAGES ===
            Message::ShellWelcome => "kanbo shell. Type 'help' for commands, 'quit' to exit.".to_string(),
            Message::ShellGoodbye => "Bye".to_string(),
            Message::ShellInputClosed => "Input closed".to_string(),
            Message::ShellReadFailed(error) => format!("Failed to read input: {}", error),
            Message::ShellCommandError(error) => error.clone(),

            // === SCHEDULER MESSAGES ===
            Message::SchedulerStarted(secs) => format!("Snapshots every {}s", secs),
            Message::SchedulerStopped { cycles, saves, failures } => {
                format!("Snapshot scheduler stopped after {} cycles ({} saves, {} failures)", cycles, saves, failures)
            }
            Message::ShuttingDown => "Shutting down...".to_string(),
            Message::ReceivedSigterm => "Received SIGTERM".to_string(),
            Message::ReceivedSigint => "Received SIGINT".to_string(),
            Message::ReceivedCtrlC => "Received Ctrl+C".to_string(),
            Message::CtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::SignalHandlingNotSupported => "Signal handling not supported on this platform".to_string(),
            Message::FailedToCreateSigtermHandler => "Failed to create SIGTERM handler".to_string(),
            Message::FailedToCreateSigintHandler => "Failed to create SIGINT handler".to_string(),
            Message::FinalSaveFailed(error) => format!("Final save failed: {}", error),
        };
        write!(f, "{}", text)
    }
}
