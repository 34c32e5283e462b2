//! Authoritative per-team totals and their durable JSON record.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::dao::storage::{StorageError, StorageResult};

/// Sole owner of the authoritative score record, in memory and on disk.
///
/// The roster of valid teams is fixed at construction; totals for teams
/// outside it are never created. Every mutation rewrites the full record
/// through a temp-file-and-rename so a concurrent reader of the file never
/// observes a partially written record.
pub struct ScoreStore {
    path: PathBuf,
    scores: IndexMap<String, i32>,
}

impl ScoreStore {
    /// Load the durable record for the given roster, failing soft.
    ///
    /// A missing, unreadable, or malformed file yields zero totals for every
    /// roster team. Totals present in the file for teams outside the roster
    /// are dropped.
    pub fn load(path: PathBuf, roster: &[String]) -> Self {
        let persisted = read_record(&path);
        let scores = roster
            .iter()
            .map(|team| {
                let total = persisted
                    .as_ref()
                    .and_then(|record| record.get(team))
                    .and_then(Value::as_i64)
                    .and_then(|value| i32::try_from(value).ok())
                    .unwrap_or(0);
                (team.clone(), total)
            })
            .collect();

        Self { path, scores }
    }

    /// Current total for `team`, or `None` when the team is not in the roster.
    pub fn get(&self, team: &str) -> Option<i32> {
        self.scores.get(team).copied()
    }

    /// Ordered view of every team's current total.
    pub fn totals(&self) -> &IndexMap<String, i32> {
        &self.scores
    }

    /// Add `delta` to the team's total and rewrite the durable record.
    ///
    /// Returns `None` when the team is not in the roster. The in-memory total
    /// is updated even when the rewrite fails; the persist outcome is handed
    /// back so the caller decides how to surface it.
    pub fn apply_delta(&mut self, team: &str, delta: i32) -> Option<(i32, StorageResult<()>)> {
        let total = {
            let slot = self.scores.get_mut(team)?;
            *slot += delta;
            *slot
        };

        Some((total, self.persist()))
    }

    /// Serialize the full record and atomically replace the durable copy.
    pub fn persist(&self) -> StorageResult<()> {
        let payload = serde_json::to_string(&self.scores)
            .map_err(|err| StorageError::persist(&self.path, err))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, payload).map_err(|err| StorageError::persist(&tmp, err))?;
        fs::rename(&tmp, &self.path).map_err(|err| StorageError::persist(&self.path, err))
    }
}

/// Read the raw persisted record, folding every failure into `None`.
fn read_record(path: &Path) -> Option<Map<String, Value>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "score record not found; starting from zero totals");
            return None;
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read score record; starting from zero totals");
            return None;
        }
    };

    match serde_json::from_str::<Map<String, Value>>(&contents) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to parse score record; starting from zero totals");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn roster() -> Vec<String> {
        vec!["Blue Boys".into(), "Red Girls".into()]
    }

    #[test]
    fn missing_record_yields_zero_totals() {
        let dir = tempdir().unwrap();
        let store = ScoreStore::load(dir.path().join("teamScores.json"), &roster());

        assert_eq!(store.get("Blue Boys"), Some(0));
        assert_eq!(store.get("Red Girls"), Some(0));
        assert_eq!(store.get("Unknown Team"), None);
    }

    #[test]
    fn absent_record_at_startup_zeroes_every_known_team() {
        let dir = tempdir().unwrap();
        let config = crate::config::AppConfig::default();
        let store = ScoreStore::load(dir.path().join("teamScores.json"), config.teams());

        assert_eq!(store.totals().len(), 10);
        assert!(store.totals().values().all(|&total| total == 0));
    }

    #[test]
    fn malformed_record_yields_zero_totals() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("teamScores.json");
        fs::write(&path, "not json at all").unwrap();

        let store = ScoreStore::load(path, &roster());
        assert_eq!(store.get("Blue Boys"), Some(0));
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("teamScores.json");

        let mut store = ScoreStore::load(path.clone(), &roster());
        store.apply_delta("Blue Boys", 30).unwrap().1.unwrap();
        store.apply_delta("Red Girls", -10).unwrap().1.unwrap();

        let reloaded = ScoreStore::load(path, &roster());
        assert_eq!(reloaded.get("Blue Boys"), Some(30));
        assert_eq!(reloaded.get("Red Girls"), Some(-10));
    }

    #[test]
    fn apply_delta_rejects_unknown_team() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("teamScores.json");
        let mut store = ScoreStore::load(path.clone(), &roster());

        assert!(store.apply_delta("Unknown Team", 5).is_none());
        assert!(!path.exists());
    }

    #[test]
    fn totals_outside_roster_are_dropped_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("teamScores.json");
        fs::write(&path, r#"{"Blue Boys": 40, "Retired Team": 99}"#).unwrap();

        let store = ScoreStore::load(path, &roster());
        assert_eq!(store.get("Blue Boys"), Some(40));
        assert_eq!(store.get("Retired Team"), None);
    }

    #[test]
    fn persist_leaves_no_temp_file_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("teamScores.json");
        let mut store = ScoreStore::load(path.clone(), &roster());

        store.apply_delta("Blue Boys", 10).unwrap().1.unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
