//! Durable local snapshot of in-progress applications.
//!
//! One JSON file mirrors the session ({step index, record, savedAt}) so a
//! restart resumes where the user left off. The store is deliberately
//! forgiving: a failed save is logged and swallowed (the form keeps
//! working without saved progress), and a corrupt snapshot loads as
//! "none" rather than an error.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::fields::Step;
use crate::record::ApplicationRecord;
use crate::session::FormSession;

/// Fixed file name under the data directory — the single storage key.
pub const SNAPSHOT_FILE: &str = "application.json";

// ─── Snapshot ─────────────────────────────────────────────────────────────────

/// The persisted mirror of a non-terminal session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// 0-based step index at save time.
    pub current_step: usize,
    /// The full record as entered so far.
    #[serde(rename = "formData")]
    pub record: ApplicationRecord,
    /// When this snapshot was written.
    pub saved_at: DateTime<Utc>,
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Save/load/clear for the single snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SNAPSHOT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the snapshot with the session's current position and
    /// record. Terminal sessions are never persisted. Failures are logged
    /// at WARN and never propagated — a broken disk must not interrupt the
    /// form.
    pub async fn save(&self, session: &FormSession) {
        let Some(current_step) = session.state.step_index() else {
            debug!("terminal session — nothing to snapshot");
            return;
        };
        let snapshot = Snapshot {
            current_step,
            record: session.record.clone(),
            saved_at: Utc::now(),
        };
        if let Err(e) = self.try_save(&snapshot).await {
            warn!(path = %self.path.display(), err = %e, "snapshot save failed");
        }
    }

    async fn try_save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        tokio::fs::write(&self.path, json).await?;
        debug!(
            path = %self.path.display(),
            step = snapshot.current_step,
            fields = snapshot.record.len(),
            "snapshot saved"
        );
        Ok(())
    }

    /// The last saved snapshot, or `None` when the file is absent, does
    /// not parse, or carries an out-of-range step index. Corruption is
    /// logged, never fatal.
    pub async fn load(&self) -> Option<Snapshot> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "snapshot read failed");
                return None;
            }
        };
        let snapshot: Snapshot = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "snapshot corrupt — ignoring");
                return None;
            }
        };
        if Step::from_index(snapshot.current_step).is_none() {
            warn!(
                step = snapshot.current_step,
                "snapshot step index out of range — ignoring"
            );
            return None;
        }
        debug!(step = snapshot.current_step, "snapshot loaded");
        Some(snapshot)
    }

    /// Remove the snapshot. Idempotent; a missing file is not an error.
    pub async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "snapshot cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), err = %e, "snapshot clear failed"),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
