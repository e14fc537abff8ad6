//! In-process task store.
//!
//! # Responsibility
//! - Own every task record and the ordered column placement of each task.
//! - Serialize all reads and writes behind one store-wide lock.
//! - Persist itself to a snapshot file on request and restore from it.
//!
//! # Invariants
//! - Every task id in a column exists in the task map and appears in exactly
//!   one column, exactly once.
//! - The task map holds no task that no column references.
//! - A task id never changes; only title and description are mutable.
//!
//! # Locking
//! `board` is the single critical section. `save` copies the board under it,
//! then encodes and writes with only `writer` held, so slow disks never stall
//! callers. `writer` serializes savers and loaders with each other; it is
//! always taken before `board`, never the other way round.

use super::error::{StoreError, StoreResult};
use super::seed::Seed;
use super::snapshot::{self, Snapshot};
use super::task::{Column, Task, TaskId};
use chrono::Local;
use parking_lot::Mutex;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Result of a [`TaskStore::save`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The snapshot file was rewritten.
    Written { bytes: usize },
    /// Nothing changed since the last successful save.
    Clean,
    /// The store has no snapshot file.
    Detached,
}

/// Result of a [`TaskStore::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// State was replaced by the snapshot on disk.
    Restored { tasks: usize },
    /// There is no snapshot file (or no path configured).
    NoSnapshot,
    /// The file exists but could not be read or decoded; it is left in place.
    Unreadable,
}

impl LoadOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, LoadOutcome::Restored { .. })
    }
}

/// One column of a [`BoardView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub id: String,
    pub tasks: Vec<Task>,
}

/// Where a task sits on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub column: String,
    pub index: usize,
}

/// Deep copy of the whole board, columns in board order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    pub fn column(&self, column_id: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    /// Ids of the tasks in `column_id`, top to bottom.
    pub fn task_ids(&self, column_id: &str) -> Vec<TaskId> {
        self.column(column_id)
            .map(|column| column.tasks.iter().map(|task| task.id.clone()).collect())
            .unwrap_or_default()
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }
}

/// Serializes as `{ "column_id": [task, ...], ... }`.
impl Serialize for BoardView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.columns.iter().map(|column| (&column.id, &column.tasks)))
    }
}

#[derive(Debug, Default)]
struct Board {
    tasks: HashMap<TaskId, Task>,
    columns: Vec<Column>,
    revision: u64,
    saved_revision: u64,
}

impl Board {
    fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn column_mut(&mut self, column_id: &str) -> &mut Column {
        let index = match self.columns.iter().position(|column| column.id == column_id) {
            Some(index) => index,
            None => {
                self.columns.push(Column::new(column_id));
                self.columns.len() - 1
            }
        };
        &mut self.columns[index]
    }

    /// Removes `task_id` from whichever column holds it.
    fn detach(&mut self, task_id: &TaskId) {
        for column in &mut self.columns {
            if let Some(position) = column.position(task_id) {
                column.task_ids.remove(position);
                return;
            }
        }
    }

    fn add(&mut self, title: &str, description: &str, column_id: &str) -> Task {
        let task = Task::new(title, description);
        self.column_mut(column_id).task_ids.push(task.id.clone());
        self.tasks.insert(task.id.clone(), task.clone());
        self.touch();
        task
    }

    fn get(&self, task_id: &TaskId) -> StoreResult<Task> {
        self.tasks.get(task_id).cloned().ok_or_else(|| StoreError::NotFound(task_id.clone()))
    }

    fn locate(&self, task_id: &TaskId) -> StoreResult<(Task, Placement)> {
        let task = self.get(task_id)?;
        self.columns
            .iter()
            .find_map(|column| {
                column.position(task_id).map(|index| Placement {
                    column: column.id.clone(),
                    index,
                })
            })
            .map(|placement| (task, placement))
            .ok_or_else(|| StoreError::NotFound(task_id.clone()))
    }

    /// `None` keeps the current description.
    fn update(&mut self, task_id: &TaskId, title: &str, description: Option<&str>) -> StoreResult<Task> {
        let task = self.tasks.get_mut(task_id).ok_or_else(|| StoreError::NotFound(task_id.clone()))?;
        task.title = title.to_string();
        if let Some(description) = description {
            task.description = description.to_string();
        }
        let updated = task.clone();
        self.touch();
        Ok(updated)
    }

    fn move_task(&mut self, task_id: &TaskId, column_id: &str, index: i64) -> StoreResult<Task> {
        let task = self.get(task_id)?;

        self.detach(task_id);
        let target = self.column_mut(column_id);
        // Clamp against the length after removal so same-column moves land
        // where the caller asked.
        let position = index.clamp(0, target.task_ids.len() as i64) as usize;
        target.task_ids.insert(position, task_id.clone());
        self.touch();

        Ok(task)
    }

    fn delete(&mut self, task_id: &TaskId) -> StoreResult<Task> {
        let task = self.tasks.remove(task_id).ok_or_else(|| StoreError::NotFound(task_id.clone()))?;
        self.detach(task_id);
        self.touch();
        Ok(task)
    }

    fn empty_column(&mut self, column_id: &str) -> usize {
        let Some(column) = self.columns.iter_mut().find(|column| column.id == column_id) else {
            return 0;
        };
        let removed = std::mem::take(&mut column.task_ids);
        if removed.is_empty() {
            return 0;
        }
        for task_id in &removed {
            self.tasks.remove(task_id);
        }
        self.touch();
        removed.len()
    }

    fn column_tasks(&self, column: &Column) -> Vec<Task> {
        column.task_ids.iter().filter_map(|id| self.tasks.get(id).cloned()).collect()
    }

    fn view(&self) -> BoardView {
        BoardView {
            columns: self
                .columns
                .iter()
                .map(|column| ColumnView {
                    id: column.id.clone(),
                    tasks: self.column_tasks(column),
                })
                .collect(),
        }
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            tasks: self.tasks.clone(),
            columns: self.columns.clone(),
            taken_at: Some(Local::now().to_rfc3339()),
        }
    }

    /// Swaps in restored content; revisions stay monotonic.
    fn replace(&mut self, snapshot: Snapshot) {
        self.tasks = snapshot.tasks;
        self.columns = snapshot.columns;
        self.touch();
    }
}

/// Thread-safe owner of tasks and their column placement.
///
/// Share it as `Arc<TaskStore>`; every method takes `&self`.
#[derive(Debug)]
pub struct TaskStore {
    board: Mutex<Board>,
    writer: Mutex<()>,
    snapshot_path: Option<PathBuf>,
}

impl TaskStore {
    /// Creates a store without a backing file.
    pub fn in_memory(seed: Seed) -> Self {
        let store = TaskStore {
            board: Mutex::new(Board::default()),
            writer: Mutex::new(()),
            snapshot_path: None,
        };
        store.plant(seed);
        store
    }

    /// Creates a store backed by `path`.
    ///
    /// Restores from the file when it holds a valid snapshot. A missing,
    /// unreadable or corrupt file falls back to `seed`; a corrupt file is
    /// left on disk untouched.
    pub fn open(path: impl Into<PathBuf>, seed: Seed) -> Self {
        let store = TaskStore {
            board: Mutex::new(Board::default()),
            writer: Mutex::new(()),
            snapshot_path: Some(path.into()),
        };
        if !store.load().is_restored() {
            store.plant(seed);
        }
        store
    }

    fn plant(&self, seed: Seed) {
        let mut board = self.board.lock();
        for column_id in seed.columns() {
            board.column_mut(column_id);
        }
        for (column_id, title) in seed.tasks() {
            board.add(title, "", column_id);
        }
        debug!(seed = ?seed, tasks = board.tasks.len(), "seeded board");
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Creates a task at the bottom of `column_id`, creating the column if needed.
    pub fn add(&self, title: &str, description: &str, column_id: &str) -> Task {
        let task = self.board.lock().add(title, description, column_id);
        debug!(task_id = %task.id, column = column_id, "task added");
        task
    }

    pub fn get(&self, task_id: &TaskId) -> StoreResult<Task> {
        self.board.lock().get(task_id)
    }

    /// The task together with its column and position.
    pub fn locate(&self, task_id: &TaskId) -> StoreResult<(Task, Placement)> {
        self.board.lock().locate(task_id)
    }

    /// Overwrites title and description.
    pub fn update(&self, task_id: &TaskId, title: &str, description: &str) -> StoreResult<Task> {
        self.edit(task_id, title, Some(description))
    }

    /// Like [`update`](Self::update), but a `None` description leaves the
    /// current one in place.
    pub fn edit(&self, task_id: &TaskId, title: &str, description: Option<&str>) -> StoreResult<Task> {
        let task = self.board.lock().update(task_id, title, description)?;
        debug!(task_id = %task_id, "task updated");
        Ok(task)
    }

    /// Moves a task to `index` within `column_id`.
    ///
    /// The index is clamped into `0..=len`, where `len` is the target
    /// column's length once the task has left its old position: past the
    /// end appends, negative prepends.
    pub fn move_task(&self, task_id: &TaskId, column_id: &str, index: i64) -> StoreResult<Task> {
        let task = self.board.lock().move_task(task_id, column_id, index)?;
        debug!(task_id = %task_id, column = column_id, index, "task moved");
        Ok(task)
    }

    /// Removes a task from the map and from its column; returns the removed task.
    pub fn delete(&self, task_id: &TaskId) -> StoreResult<Task> {
        let task = self.board.lock().delete(task_id)?;
        debug!(task_id = %task_id, "task deleted");
        Ok(task)
    }

    /// Deletes every task in `column_id` and leaves the column empty.
    ///
    /// Unknown or empty columns are a no-op. Returns how many tasks were removed.
    pub fn empty_column(&self, column_id: &str) -> usize {
        let removed = self.board.lock().empty_column(column_id);
        debug!(column = column_id, removed, "column emptied");
        removed
    }

    /// Point-in-time copy of every column and its tasks.
    pub fn list_all(&self) -> BoardView {
        self.board.lock().view()
    }

    /// Tasks of one column in order; empty for an unknown column.
    pub fn column_tasks(&self, column_id: &str) -> Vec<Task> {
        let board = self.board.lock();
        board
            .columns
            .iter()
            .find(|column| column.id == column_id)
            .map(|column| board.column_tasks(column))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.board.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether there are mutations not yet written by a successful save.
    pub fn is_dirty(&self) -> bool {
        self.board.lock().is_dirty()
    }

    /// Copies the full state.
    pub fn snapshot(&self) -> Snapshot {
        self.board.lock().to_snapshot()
    }

    /// Replaces the full state with `snapshot`.
    ///
    /// The input is sanitized first, so the store invariants hold whatever
    /// it contains. The store is marked dirty.
    pub fn restore(&self, mut snapshot: Snapshot) {
        let repairs = snapshot.sanitize();
        if !repairs.is_clean() {
            warn!(?repairs, "restored snapshot needed repairs");
        }
        self.board.lock().replace(snapshot);
    }

    /// Writes the board to the snapshot file if it changed since the last save.
    ///
    /// The dirty flag clears only when the write succeeds and nothing was
    /// mutated while the write was in flight.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be written. The store
    /// stays dirty so the next call retries.
    pub fn save(&self) -> StoreResult<SaveOutcome> {
        let Some(path) = self.snapshot_path.as_deref() else {
            return Ok(SaveOutcome::Detached);
        };

        let _writer = self.writer.lock();
        let (snapshot, revision) = {
            let board = self.board.lock();
            if !board.is_dirty() {
                return Ok(SaveOutcome::Clean);
            }
            (board.to_snapshot(), board.revision)
        };

        let bytes = snapshot::encode(&snapshot)?;
        if let Err(err) = snapshot::write_atomic(path, &bytes) {
            error!(path = %path.display(), error = %err, "failed to save board");
            return Err(err);
        }

        let mut board = self.board.lock();
        board.saved_revision = board.saved_revision.max(revision);
        info!(path = %path.display(), tasks = snapshot.tasks.len(), bytes = bytes.len(), "board saved");
        Ok(SaveOutcome::Written { bytes: bytes.len() })
    }

    /// Replaces the board with the contents of the snapshot file.
    ///
    /// Never fails: an unreadable or corrupt file is logged and reported as
    /// [`LoadOutcome::Unreadable`], leaving the current state untouched.
    pub fn load(&self) -> LoadOutcome {
        let Some(path) = self.snapshot_path.as_deref() else {
            return LoadOutcome::NoSnapshot;
        };

        let _writer = self.writer.lock();
        match snapshot::read(path) {
            Ok(Some(snapshot)) => {
                let tasks = snapshot.tasks.len();
                let taken_at = snapshot.taken_at.clone().unwrap_or_else(|| "unknown".to_string());
                let mut board = self.board.lock();
                board.replace(snapshot);
                board.saved_revision = board.revision;
                info!(path = %path.display(), tasks, taken_at = %taken_at, "board restored");
                LoadOutcome::Restored { tasks }
            }
            Ok(None) => {
                info!(path = %path.display(), "no snapshot file found");
                LoadOutcome::NoSnapshot
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable snapshot file");
                LoadOutcome::Unreadable
            }
        }
    }
}
