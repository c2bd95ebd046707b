//! Shared test utilities for the rfg-favicons test suite.
//!
//! Provides a throwaway site directory with picture files, a way to build
//! normalized options from a TOML fragment, and an in-memory cache store.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = setup_site();
//! let options = options_with("[ios]\nmargin = 4");
//! let request = assemble(&options, site.path()).unwrap();
//!
//! let mut store = MemoryStore::default();
//! store.set(DIGEST_KEY, "abc").unwrap();
//! ```

use std::collections::BTreeMap;
use tempfile::TempDir;

use crate::cache::{CacheError, CacheStore};
use crate::config::{EffectiveOptions, RawOptions, merge_toml, normalize};

// =========================================================================
// Fixture setup
// =========================================================================

/// Contents of `icon.png` in [`setup_site`]. Not a real PNG; the crate only
/// ever base64-encodes picture bytes.
pub const ICON_BYTES: &[u8] = b"\x89PNG icon";

/// Contents of `splash.png` in [`setup_site`].
pub const SPLASH_BYTES: &[u8] = b"\x89PNG splash";

/// Create a temp site directory holding `icon.png` and `splash.png`.
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("icon.png"), ICON_BYTES).unwrap();
    std::fs::write(tmp.path().join("splash.png"), SPLASH_BYTES).unwrap();
    tmp
}

/// The required options every test config starts from.
pub const REQUIRED: &str = r##"
api_key = "test-key"
master_picture = "icon.png"
app_name = "Test Site"
theme_color = "#336699"
"##;

/// Normalized options: [`REQUIRED`] with `extra` merged on top.
///
/// `extra` may override required keys, e.g. `master_picture = "nope.png"`.
pub fn options_with(extra: &str) -> EffectiveOptions {
    let base = RawOptions::parse(REQUIRED).unwrap().into_value();
    let overlay = RawOptions::parse(extra).unwrap().into_value();
    let merged = match merge_toml(base, overlay) {
        toml::Value::Table(table) => table,
        other => panic!("merged options are not a table: {other:?}"),
    };
    normalize(RawOptions::from_table(merged)).unwrap()
}

// =========================================================================
// Cache store
// =========================================================================

/// [`CacheStore`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub entries: BTreeMap<String, String>,
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
