//! Interactive board session.
//!
//! Keeps one store open for the whole session. The snapshot scheduler runs in
//! the background while commands are read from stdin; leaving the shell (or
//! SIGINT/SIGTERM) stops the scheduler and flushes the board.

use super::board::{self, BoardCommand};
use crate::libs::config::Config;
use crate::libs::daemon;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::store::TaskStore;
use crate::{msg_error, msg_print};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio::sync::oneshot;

const PROMPT: &str = "kanbo> ";

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    #[command(flatten)]
    Board(BoardCommand),
    #[command(about = "Write the board to the snapshot file now")]
    Save,
    #[command(about = "Leave the shell", visible_alias = "exit")]
    Quit,
}

/// What the shell does after a line.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub async fn cmd() -> Result<()> {
    let storage = DataStorage::new();
    let config = Config::read()?.store();
    let store = Arc::new(config.open_store(&storage)?);

    let (done_tx, done_rx) = oneshot::channel();
    let session_store = Arc::clone(&store);
    // stdin reads block, so the session gets its own thread; on a signal the
    // process exits without waiting for it.
    std::thread::spawn(move || {
        run_session(&session_store, io::stdin().lock());
        let _ = done_tx.send(());
    });

    let shutdown = async {
        tokio::select! {
            _ = done_rx => {}
            _ = daemon::wait_for_signal() => {}
        }
    };
    daemon::run_until_shutdown(store, config.save_period(), shutdown).await;

    msg_print!(Message::ShellGoodbye);
    Ok(())
}

/// Reads and runs lines from `input` until `quit` or end of input.
pub fn run_session(store: &TaskStore, mut input: impl BufRead) {
    msg_print!(Message::ShellWelcome);

    let mut line = String::new();
    loop {
        print!("{}", PROMPT);
        let _ = io::stdout().flush();

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => {
                msg_print!(Message::ShellInputClosed);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                msg_error!(Message::ShellReadFailed(e.to_string()));
                break;
            }
        }

        if run_line(store, &line) == Flow::Quit {
            break;
        }
    }
}

/// Parses and runs one shell line. Errors are printed, never returned.
pub fn run_line(store: &TaskStore, line: &str) -> Flow {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Flow::Continue;
    }

    let parsed = match ShellLine::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) => {
            // also covers `help`, which clap reports as an "error"
            let _ = e.print();
            return Flow::Continue;
        }
    };

    let result = match parsed.command {
        ShellCommand::Board(command) => board::execute(store, command),
        ShellCommand::Save => board::save(store),
        ShellCommand::Quit => return Flow::Quit,
    };
    if let Err(e) = result {
        msg_error!(Message::ShellCommandError(e.to_string()));
    }
    Flow::Continue
}
