//! Snapshot codec for the task store.
//!
//! Converts a point-in-time copy of the board to and from the persisted JSON
//! document, and reads/writes that document on disk.
//!
//! ## File format
//!
//! ```json
//! {
//!   "tasks": {
//!     "5f0c...": { "id": "5f0c...", "title": "Write spec", "description": "" }
//!   },
//!   "columns": {
//!     "ideas": ["5f0c..."],
//!     "done": []
//!   },
//!   "backup_timestamp": "2025-03-01T10:15:00+01:00"
//! }
//! ```
//!
//! Column entries keep board order in both directions. Unknown fields are
//! ignored; `description`, the inner `id` and `backup_timestamp` may be
//! omitted. A decoded snapshot always satisfies the partition invariant:
//! dangling or repeated references and unreferenced tasks are dropped.

use super::error::{StoreError, StoreResult};
use super::task::{Column, Task, TaskId};
use chrono::Local;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default snapshot file name inside the data directory.
pub const SNAPSHOT_FILE_NAME: &str = "database.json";

/// Full copy of the board: the task table plus the ordered columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub tasks: HashMap<TaskId, Task>,
    pub columns: Vec<Column>,
    /// When the snapshot was taken, RFC 3339 local time.
    pub taken_at: Option<String>,
}

/// What [`Snapshot::sanitize`] had to drop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Repairs {
    pub dangling_refs: usize,
    pub duplicate_refs: usize,
    pub orphaned_tasks: usize,
}

impl Repairs {
    pub fn is_clean(&self) -> bool {
        *self == Repairs::default()
    }
}

impl Snapshot {
    /// Tasks in board order: column by column, top to bottom.
    pub fn ordered_tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns
            .iter()
            .flat_map(|column| column.task_ids.iter())
            .filter_map(|id| self.tasks.get(id))
    }

    /// Forces the partition invariant onto arbitrary input.
    ///
    /// Columns sharing a key are merged in order of appearance. References
    /// to unknown tasks are dropped, a task referenced more than once keeps
    /// its first position, and tasks no column references are removed.
    pub fn sanitize(&mut self) -> Repairs {
        let Snapshot { tasks, columns, .. } = self;
        let mut repairs = Repairs::default();

        let mut merged: Vec<Column> = Vec::with_capacity(columns.len());
        for column in columns.drain(..) {
            match merged.iter_mut().find(|existing| existing.id == column.id) {
                Some(existing) => existing.task_ids.extend(column.task_ids),
                None => merged.push(column),
            }
        }

        let mut seen: HashSet<TaskId> = HashSet::with_capacity(tasks.len());
        for column in &mut merged {
            column.task_ids.retain(|id| {
                if !tasks.contains_key(id) {
                    repairs.dangling_refs += 1;
                    false
                } else if !seen.insert(id.clone()) {
                    repairs.duplicate_refs += 1;
                    false
                } else {
                    true
                }
            });
        }
        *columns = merged;

        let before = tasks.len();
        tasks.retain(|id, _| seen.contains(id));
        repairs.orphaned_tasks = before - tasks.len();

        repairs
    }
}

/// Serializes a snapshot into the persisted JSON document.
///
/// Tasks are written in board order so identical boards produce identical
/// files. Tasks that no column references are not written.
pub fn encode(snapshot: &Snapshot) -> StoreResult<Vec<u8>> {
    let taken_at = snapshot
        .taken_at
        .clone()
        .unwrap_or_else(|| Local::now().to_rfc3339());
    let document = SnapshotDocument {
        tasks: TaskTable(snapshot),
        columns: ColumnTable(&snapshot.columns),
        backup_timestamp: &taken_at,
    };
    let bytes = serde_json::to_vec_pretty(&document).map_err(StoreError::Encode)?;
    Ok(bytes)
}

/// Parses a persisted JSON document back into a snapshot.
///
/// # Errors
///
/// Returns [`StoreError::CorruptSnapshot`] when the input is not JSON, is not
/// an object, lacks `tasks` or `columns`, has a task without `title`, or has
/// a task whose `id` disagrees with its key.
pub fn decode(bytes: &[u8]) -> StoreResult<Snapshot> {
    let document: SnapshotFile =
        serde_json::from_slice(bytes).map_err(|err| StoreError::CorruptSnapshot(err.to_string()))?;

    let mut tasks = HashMap::with_capacity(document.tasks.len());
    for (key, record) in document.tasks {
        let id = TaskId::from(key);
        if let Some(inner) = record.id.as_deref() {
            if inner != id.as_str() {
                return Err(StoreError::CorruptSnapshot(format!("task entry '{}' holds a record for '{}'", id, inner)));
            }
        }
        let task = Task {
            id: id.clone(),
            title: record.title,
            description: record.description.unwrap_or_default(),
        };
        tasks.insert(id, task);
    }

    let mut snapshot = Snapshot {
        tasks,
        columns: document.columns.0,
        taken_at: document.backup_timestamp,
    };
    let repairs = snapshot.sanitize();
    if !repairs.is_clean() {
        warn!(
            dangling = repairs.dangling_refs,
            duplicates = repairs.duplicate_refs,
            orphans = repairs.orphaned_tasks,
            "snapshot needed repairs while decoding"
        );
    }

    Ok(snapshot)
}

/// Reads and decodes a snapshot file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn read(path: &Path) -> StoreResult<Option<Snapshot>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::io(path, err)),
    };
    debug!(path = %path.display(), bytes = bytes.len(), "read snapshot file");
    decode(&bytes).map(Some)
}

/// Writes bytes to `path` via a synced temporary file and a rename, so a
/// crash mid-write leaves the previous snapshot intact.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    }

    let tmp_path = temp_path_for(path);
    let mut file = File::create(&tmp_path).map_err(|err| StoreError::io(&tmp_path, err))?;
    file.write_all(bytes).map_err(|err| StoreError::io(&tmp_path, err))?;
    file.sync_all().map_err(|err| StoreError::io(&tmp_path, err))?;

    fs::rename(&tmp_path, path).map_err(|err| StoreError::io(path, err))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_else(|| OsString::from(SNAPSHOT_FILE_NAME));
    name.push(".tmp");
    path.with_file_name(name)
}

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    tasks: TaskTable<'a>,
    columns: ColumnTable<'a>,
    backup_timestamp: &'a str,
}

struct TaskTable<'a>(&'a Snapshot);

impl Serialize for TaskTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.ordered_tasks().map(|task| (&task.id, task)))
    }
}

struct ColumnTable<'a>(&'a [Column]);

impl Serialize for ColumnTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|column| (&column.id, &column.task_ids)))
    }
}

#[derive(Deserialize)]
struct SnapshotFile {
    tasks: HashMap<String, TaskRecord>,
    columns: ColumnOrder,
    #[serde(default)]
    backup_timestamp: Option<String>,
}

#[derive(Deserialize)]
struct TaskRecord {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    description: Option<String>,
}

/// Column map that keeps the order entries appear in the document.
struct ColumnOrder(Vec<Column>);

impl<'de> Deserialize<'de> for ColumnOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColumnOrderVisitor;

        impl<'de> Visitor<'de> for ColumnOrderVisitor {
            type Value = ColumnOrder;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column ids to arrays of task ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut columns = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, task_ids)) = map.next_entry::<String, Vec<TaskId>>()? {
                    columns.push(Column { id, task_ids });
                }
                Ok(ColumnOrder(columns))
            }
        }

        deserializer.deserialize_map(ColumnOrderVisitor)
    }
}
