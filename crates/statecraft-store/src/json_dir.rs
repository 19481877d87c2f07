//! Directory-of-JSON store adapter: one `<nation>.json` file per nation.
//!
//! The file format is a small versioned envelope:
//!
//! ```json
//! {
//!   "version": 1,
//!   "updated_at_ms": 1724366000123,
//!   "technologies": ["basic_military", "fortifications"]
//! }
//! ```
//!
//! Records are rewritten in full on every save. `load_all` skips files it
//! cannot parse (with a warning) so one damaged record does not block
//! startup; [`JsonDirStore::load_nation`] is the strict single-record read.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use statecraft_core::{NationId, TechId};

use crate::{ProgressStore, StoreError};

/// Current record format version. Increment when breaking the envelope.
pub const PROGRESS_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct ProgressRecord {
    version: u32,
    updated_at_ms: u64,
    technologies: Vec<TechId>,
}

/// Stores each nation's record as `<dir>/<nation>.json`.
#[derive(Debug)]
pub struct JsonDirStore {
    dir: PathBuf,
    pretty: bool,
}

impl JsonDirStore {
    /// A store rooted at `dir`. The directory is created on first save;
    /// a missing directory loads as "no records yet".
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty: false,
        }
    }

    /// Write human-readable records, for hand-editable save data.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Strict read of one nation's record. `Ok(None)` when no record
    /// exists; parse and version problems are errors rather than skips.
    pub fn load_nation(&self, nation: &NationId) -> Result<Option<HashSet<TechId>>, StoreError> {
        let path = self.record_path(nation)?;
        if !path.exists() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    fn record_path(&self, nation: &NationId) -> Result<PathBuf, StoreError> {
        let key = nation.as_str();
        let usable = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !usable {
            return Err(StoreError::InvalidNationId(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn read_record(path: &Path) -> Result<HashSet<TechId>, StoreError> {
    let text = fs::read_to_string(path)?;
    let record: ProgressRecord =
        serde_json::from_str(&text).map_err(|e| StoreError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    if record.version != PROGRESS_FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            file: path.to_path_buf(),
            version: record.version,
        });
    }
    Ok(record.technologies.into_iter().collect())
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl ProgressStore for JsonDirStore {
    fn load_all(&self) -> Result<HashMap<NationId, HashSet<TechId>>, StoreError> {
        let mut records = HashMap::new();
        if !self.dir.exists() {
            debug!(dir = %self.dir.display(), "progress directory missing, starting empty");
            return Ok(records);
        }

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match read_record(&path) {
                Ok(unlocked) => {
                    records.insert(NationId::new(stem), unlocked);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable progress record");
                }
            }
        }

        debug!(count = records.len(), "loaded progress records");
        Ok(records)
    }

    fn save(&self, nation: &NationId, unlocked: &HashSet<TechId>) -> Result<(), StoreError> {
        let path = self.record_path(nation)?;
        fs::create_dir_all(&self.dir)?;

        let mut technologies: Vec<TechId> = unlocked.iter().cloned().collect();
        technologies.sort_unstable();

        let record = ProgressRecord {
            version: PROGRESS_FORMAT_VERSION,
            updated_at_ms: now_millis(),
            technologies,
        };
        let text = if self.pretty {
            serde_json::to_string_pretty(&record)
        } else {
            serde_json::to_string(&record)
        }
        .map_err(|e| StoreError::Parse {
            file: path.clone(),
            detail: e.to_string(),
        })?;

        fs::write(&path, text)?;
        debug!(nation = %nation, count = unlocked.len(), "saved progress record");
        Ok(())
    }
}
