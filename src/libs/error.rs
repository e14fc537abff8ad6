//! Error taxonomy of the task store.
//!
//! Only [`StoreError::NotFound`] is expected to reach callers during normal
//! operation. Snapshot problems are handled inside the store when it opens
//! or reloads, and surface from `save` only so the caller can log them.

use super::task::TaskId;
use std::path::PathBuf;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced task is not in the task map.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// Persisted data could not be decoded into a board.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// The board could not be serialized.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O failed for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io { path: path.into(), source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_failures_keep_their_own_kind() {
        let source = serde_json::from_str::<u8>("256").unwrap_err();
        let err = StoreError::Encode(source);

        assert!(!matches!(err, StoreError::CorruptSnapshot(_)));
        assert!(err.to_string().starts_with("failed to encode snapshot"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
