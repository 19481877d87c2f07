//! Catalog loading: format detection, file discovery, deserialization
//! and registry construction.

use std::path::{Path, PathBuf};

use statecraft_core::registry::{RegistryBuilder, RegistryError, TechRegistry};
use statecraft_core::tech::Technology;

use crate::catalog::default_catalog;
use crate::schema::{CatalogFile, TechnologyData};

/// Base name catalog files are discovered under, without extension.
pub const CATALOG_BASE_NAME: &str = "technologies";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a catalog from disk.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two catalog files with different formats exist side by side.
    #[error("conflicting catalog files: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The file parsed but the technologies do not form a valid catalog.
    #[error("invalid catalog in {file}: {source}")]
    Invalid {
        file: PathBuf,
        source: RegistryError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection and file discovery
// ===========================================================================

/// Supported catalog file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Scan a directory for a catalog file.
///
/// Looks for `technologies.ron`, `technologies.toml` and
/// `technologies.json`. Returns `Ok(None)` if none exists, or
/// `Err(ConflictingFormats)` if more than one does; a silently ignored
/// second file is how an operator edit gets lost.
pub fn find_catalog_file(dir: &Path) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{CATALOG_BASE_NAME}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Loading
// ===========================================================================

/// Read a catalog file and resolve its entries, format detected from the
/// extension. RON and JSON files hold a bare list; TOML files a
/// `[[technologies]]` array of tables.
pub fn load_technologies(path: &Path) -> Result<Vec<Technology>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    let entries: Vec<TechnologyData> = match format {
        Format::Ron => ron::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })?,
        Format::Json => serde_json::from_str(&content).map_err(|e| DataLoadError::Parse {
            file: path.to_path_buf(),
            detail: e.to_string(),
        })?,
        Format::Toml => {
            let catalog: CatalogFile =
                toml::from_str(&content).map_err(|e| DataLoadError::Parse {
                    file: path.to_path_buf(),
                    detail: e.to_string(),
                })?;
            catalog.technologies
        }
    };

    Ok(entries
        .into_iter()
        .map(TechnologyData::into_technology)
        .collect())
}

/// Load a catalog file and build the validated registry from it.
pub fn load_catalog(path: &Path) -> Result<TechRegistry, DataLoadError> {
    let invalid = |source: RegistryError| DataLoadError::Invalid {
        file: path.to_path_buf(),
        source,
    };

    let mut builder = RegistryBuilder::new();
    for tech in load_technologies(path)? {
        builder.register(tech).map_err(invalid)?;
    }
    builder.build().map_err(invalid)
}

/// Load the catalog from `dir` if a catalog file exists there, falling
/// back to the built-in tree.
pub fn load_catalog_or_default(dir: &Path) -> Result<TechRegistry, DataLoadError> {
    match find_catalog_file(dir)? {
        Some(path) => load_catalog(&path),
        None => Ok(default_catalog()),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
