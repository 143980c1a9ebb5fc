//! Periodic JSON checkpoints of the full engine state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::state::EconomyState;

pub struct SnapshotWriter {
    dir: PathBuf,
    interval_weeks: u64,
}

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    saved_at: String,
    state: &'a EconomyState,
}

impl SnapshotWriter {
    /// An interval of zero disables snapshotting entirely.
    pub fn new(dir: impl AsRef<Path>, interval_weeks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_weeks,
        }
    }

    pub fn maybe_write(&self, state: &EconomyState) -> Result<Option<PathBuf>> {
        if self.interval_weeks == 0 || state.week == 0 || state.week % self.interval_weeks != 0
        {
            return Ok(None);
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create snapshot dir {}", self.dir.display()))?;
        let path = self.dir.join(format!("week_{:05}.json", state.week));
        let document = SnapshotDocument {
            saved_at: chrono::Utc::now().to_rfc3339(),
            state,
        };
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_only_on_interval_boundaries() {
        let temp = tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 3);
        let mut state = EconomyState::default();

        for week in 1..=6 {
            state.week = week;
            let written = writer.maybe_write(&state).unwrap();
            assert_eq!(written.is_some(), week % 3 == 0, "week {week}");
        }
    }

    #[test]
    fn zero_interval_disables_snapshots() {
        let temp = tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 0);
        let mut state = EconomyState::default();
        state.week = 10;
        assert!(writer.maybe_write(&state).unwrap().is_none());
    }

    #[test]
    fn snapshot_state_round_trips() {
        let temp = tempdir().unwrap();
        let writer = SnapshotWriter::new(temp.path(), 1);
        let mut state = EconomyState::default();
        state.week = 1;
        state.metrics.confidence = 42.0;

        let path = writer.maybe_write(&state).unwrap().unwrap();
        let text = fs::read_to_string(path).unwrap();
        let document: serde_json::Value = serde_json::from_str(&text).unwrap();
        let restored: EconomyState =
            serde_json::from_value(document["state"].clone()).unwrap();
        assert_eq!(restored.week, 1);
        assert_eq!(restored.metrics.confidence, 42.0);
        assert_eq!(restored.cycle, state.cycle);
    }
}
