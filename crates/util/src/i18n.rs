//! Translation lookup for user-visible labels.
//!
//! Components receive an `Arc<dyn Translator>` at construction time instead
//! of reaching for a process-wide lookup, so tests can render without any
//! global setup.

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Pure, synchronous key → text lookup.
pub trait Translator: Send + Sync + Debug {
    fn translate(&self, key: &str) -> String;
}

/// Returns every key unchanged (English source strings).
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Error surfaced when a translation catalog cannot be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read translation catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("translation catalog is not a JSON object of strings: {0}")]
    Format(#[from] serde_json::Error),
}

/// Catalog of translated strings keyed by their English source text.
///
/// Keys that are missing from the catalog fall back to the key itself.
#[derive(Debug, Default, Clone)]
pub struct CatalogTranslator {
    entries: HashMap<String, String>,
}

impl CatalogTranslator {
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&data)?;
        debug!(path = %path.display(), entries = catalog.len(), "loaded translation catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, key: &str) -> String {
        self.entries.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}
