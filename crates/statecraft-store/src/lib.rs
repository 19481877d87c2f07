//! Statecraft Store -- durable per-nation progression records.
//!
//! A [`ProgressStore`] holds one record per nation: the set of technology
//! ids that nation has unlocked. Records are loaded once at startup and
//! rewritten in full after every successful research, so the store never
//! needs to understand increments or ordering.
//!
//! Two adapters are provided:
//!
//! - [`memory::MemoryStore`] -- plain in-process map, for tests and for
//!   embedders that persist elsewhere.
//! - [`json_dir::JsonDirStore`] -- one JSON file per nation inside a
//!   directory, for plain on-disk saves.
//!
//! On top of the store sits the [`ledger::ProgressLedger`], the in-memory
//! working copy with a lock per nation. All progression mutations go
//! through the ledger; see `statecraft-research` for the mutation path.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;

use statecraft_core::{NationId, TechId};

pub mod json_dir;
pub mod ledger;
pub mod memory;

pub use json_dir::JsonDirStore;
pub use ledger::ProgressLedger;
pub use memory::MemoryStore;

/// Errors from loading or saving progression records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The nation id cannot be used as a storage key (empty, or contains
    /// path separators).
    #[error("nation id unusable as storage key: {0:?}")]
    InvalidNationId(String),

    /// A record failed to deserialize.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A record was written by an unknown format version.
    #[error("unsupported progress version {version} in {file}")]
    UnsupportedVersion { file: PathBuf, version: u32 },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Durable storage for per-nation unlocked sets.
///
/// `save` receives the complete set every time; implementations replace the
/// nation's record wholesale. Implementations must be callable from any
/// thread, but the ledger already serializes saves per nation.
pub trait ProgressStore: fmt::Debug + Send + Sync {
    /// Load every nation's unlocked set. Called once at startup.
    fn load_all(&self) -> Result<HashMap<NationId, HashSet<TechId>>, StoreError>;

    /// Replace one nation's record with `unlocked`.
    fn save(&self, nation: &NationId, unlocked: &HashSet<TechId>) -> Result<(), StoreError>;
}
