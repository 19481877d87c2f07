//! Catalog data: the built-in technology tree and the loader for
//! replacing it with data files.
//!
//! Server operators can drop a `technologies.ron`, `technologies.toml`
//! or `technologies.json` into their config directory to reshape the
//! whole tree without touching code. Absent that, [`default_catalog`]
//! provides the stock tree.

pub mod catalog;
pub mod loader;
pub mod schema;

pub use catalog::{default_catalog, default_technologies};
pub use loader::{
    CATALOG_BASE_NAME, DataLoadError, Format, detect_format, find_catalog_file, load_catalog,
    load_catalog_or_default, load_technologies,
};
pub use schema::{CatalogFile, TechnologyData};
