//! Inbox of externally requested score deltas.

use std::{fs, io::ErrorKind, path::PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::dao::storage::{StorageError, StorageResult};

/// Representation that an empty inbox is reset to.
const EMPTY_RECORD: &str = "{}";

/// File-backed inbox written by the external change API and consumed here.
///
/// Reads are total: absence, emptiness, and malformed content all fold into
/// "no pending deltas". The external writer's keys are not validated against
/// the roster; that happens at the mutation chokepoint.
pub struct PendingChangeSource {
    path: PathBuf,
}

impl PendingChangeSource {
    /// Build a source over the pending-delta record at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Snapshot the deltas currently in the inbox, in record order.
    ///
    /// Values that are not integers default to 0 for their key. Never fails:
    /// an unreadable or unparseable record is an empty mapping.
    pub fn drain(&self) -> IndexMap<String, i32> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return IndexMap::new(),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "failed to read pending record");
                return IndexMap::new();
            }
        };

        if contents.trim().is_empty() {
            return IndexMap::new();
        }

        match serde_json::from_str::<Map<String, Value>>(&contents) {
            Ok(record) => record
                .into_iter()
                .map(|(team, value)| {
                    let delta = value
                        .as_i64()
                        .and_then(|delta| i32::try_from(delta).ok())
                        .unwrap_or(0);
                    (team, delta)
                })
                .collect(),
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "failed to parse pending record");
                IndexMap::new()
            }
        }
    }

    /// Overwrite the inbox with an empty record.
    ///
    /// Called only once every drained entry has been attempted; a failed
    /// clear leaves the record in place for the next tick.
    pub fn clear(&self) -> StorageResult<()> {
        fs::write(&self.path, EMPTY_RECORD).map_err(|err| StorageError::clear(&self.path, err))
    }
}
