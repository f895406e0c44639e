//! File store
//!
//! The authoritative last-known-persisted snapshot of every file touched
//! in the session. Snapshots are inserted whole: there is no partial
//! update path into the store; edits live in the change buffer until a
//! save promotes them.

use dashmap::DashMap;
use easel_document::{FileId, FileRecord};

/// Concurrent map of file snapshots
#[derive(Debug, Default)]
pub(crate) struct FileStore {
    files: DashMap<FileId, FileRecord>,
}

impl FileStore {
    pub(crate) fn new() -> Self {
        Self {
            files: DashMap::new(),
        }
    }

    /// Insert or replace a full snapshot
    pub(crate) fn set(&self, record: FileRecord) {
        self.files.insert(record.id, record);
    }

    /// Snapshot by id; `None` means "not yet loaded", never an error
    pub(crate) fn get(&self, id: FileId) -> Option<FileRecord> {
        self.files.get(&id).map(|entry| entry.clone())
    }

    pub(crate) fn remove(&self, id: FileId) -> Option<FileRecord> {
        self.files.remove(&id).map(|(_, record)| record)
    }

    pub(crate) fn contains(&self, id: FileId) -> bool {
        self.files.contains_key(&id)
    }

    /// Ids of every loaded file, in no particular order
    pub(crate) fn ids(&self) -> Vec<FileId> {
        self.files.iter().map(|entry| *entry.key()).collect()
    }
}
