//! Core library modules for kanbo.
//!
//! ## Features
//!
//! - **Task Store**: tasks in ordered columns behind one lock ([`store`])
//! - **Snapshots**: JSON codec and atomic file writes ([`snapshot`])
//! - **Scheduling**: periodic background saves ([`scheduler`], [`daemon`])
//! - **Infrastructure**: configuration, data directory, messages, errors
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kanbo::libs::seed::Seed;
//! use kanbo::libs::store::TaskStore;
//!
//! let store = TaskStore::open("/tmp/kanbo/database.json", Seed::Empty);
//! let task = store.add("Write docs", "", "ideas");
//! store.move_task(&task.id, "in_progress", 0)?;
//! store.save()?;
//! # Ok::<(), kanbo::libs::error::StoreError>(())
//! ```

pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod error;
pub mod messages;
pub mod scheduler;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod task;
pub mod view;
