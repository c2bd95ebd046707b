//! Persistent key-value cache and freshness classification.
//!
//! Calling the generation service is slow and has side effects on the
//! service's own storage, so a build only calls it when the compiled request
//! changed since the last *successful* generation. This module holds the two
//! pieces that decision needs.
//!
//! # Store
//!
//! [`CacheStore`] is the narrow `get`/`set` interface a build host hands us.
//! [`FileStore`] is the stand-alone implementation: a versioned JSON map on
//! disk, written through on every `set`.
//!
//! ```json
//! { "version": 1, "entries": { "realfavicon-request-digest": "3f2a…" } }
//! ```
//!
//! A missing, corrupt, or old-version file loads as empty. The worst case is
//! one unnecessary regeneration, never a stale result marked fresh.
//!
//! # Freshness
//!
//! ```text
//! no stored digest                                → Unknown
//! stored ≠ current, or prior output missing       → Stale
//! stored = current and prior output present       → Fresh
//! ```
//!
//! Only `Fresh` skips generation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key under which the last successful request digest is stored.
pub const DIGEST_KEY: &str = "realfavicon-request-digest";

/// Default location of the [`FileStore`] file.
pub const DEFAULT_STORE_PATH: &str = ".cache/rfg-favicons-store.json";

/// Version of the store file format. Bump this to drop all existing stores
/// when the format or digest computation changes.
const STORE_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persistent string key-value store scoped to one project.
pub trait CacheStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError>;
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StoreFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// [`CacheStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. Starts empty if the file doesn't exist or
    /// can't be parsed (version mismatch, corruption).
    pub fn open(path: &Path) -> Self {
        let entries = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<StoreFile>(&content).ok())
            .filter(|file| file.version == STORE_VERSION)
            .map(|file| file.entries)
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = StoreFile {
            version: STORE_VERSION,
            entries: self.entries.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// How the current request relates to the last successful generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No digest has ever been stored.
    Unknown,
    /// The digest changed, or the previous output is gone.
    Stale,
    /// Same digest, previous output still on disk.
    Fresh,
}

impl Freshness {
    pub fn needs_regeneration(self) -> bool {
        self != Freshness::Fresh
    }
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Freshness::Unknown => "unknown",
            Freshness::Stale => "stale",
            Freshness::Fresh => "fresh",
        };
        f.write_str(label)
    }
}

/// Classify the current digest against the stored one.
pub fn classify(stored: Option<&str>, current: &str, prior_output_exists: bool) -> Freshness {
    match stored {
        None => Freshness::Unknown,
        Some(digest) if digest == current && prior_output_exists => Freshness::Fresh,
        Some(_) => Freshness::Stale,
    }
}
