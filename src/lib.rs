//! # Kanbo - Kanban board store
//!
//! A small task-board backend: tasks grouped into ordered columns, a
//! thread-safe in-process store and periodic JSON snapshots that let the
//! board survive restarts.
//!
//! ## Features
//!
//! - **Task Store**: add, edit, move, delete and list tasks across columns
//! - **Snapshots**: pretty-printed JSON, written atomically, validated on load
//! - **Background Saves**: a tokio scheduler writes the board when it changed
//! - **CLI**: one-shot board commands and an interactive shell
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kanbo::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod libs;
