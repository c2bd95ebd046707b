//! Fixed on-disk layout for generated favicons.
//!
//! ```text
//! .cache/realfavicongenerator/   ← cache dir: last generated package
//! ├── response.json              ← last GenerationResult (freshness marker)
//! ├── site.webmanifest
//! ├── favicon.ico
//! └── ...
//! public/
//! ├── favicon.ico                ← copied to the site root
//! └── favicons/                  ← PUBLIC_PATH: copy of the cache dir
//! ```

use std::path::{Path, PathBuf};

/// URL path the service is told the generated files will be served from.
pub const PUBLIC_PATH: &str = "/favicons";

pub const RESPONSE_FILENAME: &str = "response.json";
pub const WEB_MANIFEST_FILENAME: &str = "site.webmanifest";
pub const FAVICON_ICO_FILENAME: &str = "favicon.ico";

pub const DEFAULT_CACHE_DIR: &str = ".cache/realfavicongenerator";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub cache_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl BuildPaths {
    pub fn new(cache_dir: impl Into<PathBuf>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            public_dir: public_dir.into(),
        }
    }

    /// Both directories under `root`, at their default names.
    pub fn under(root: &Path) -> Self {
        Self::new(root.join(DEFAULT_CACHE_DIR), root.join(DEFAULT_PUBLIC_DIR))
    }

    /// Sibling directory a new package is generated into before it replaces
    /// the cache dir.
    pub fn staging_dir(&self) -> PathBuf {
        let mut name = self
            .cache_dir
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".staging");
        self.cache_dir.with_file_name(name)
    }

    pub fn cached_response(&self) -> PathBuf {
        self.cache_dir.join(RESPONSE_FILENAME)
    }

    pub fn cached_manifest(&self) -> PathBuf {
        self.cache_dir.join(WEB_MANIFEST_FILENAME)
    }

    pub fn public_favicons_dir(&self) -> PathBuf {
        self.public_dir.join(PUBLIC_PATH.trim_start_matches('/'))
    }

    pub fn public_response(&self) -> PathBuf {
        self.public_favicons_dir().join(RESPONSE_FILENAME)
    }

    pub fn public_manifest(&self) -> PathBuf {
        self.public_favicons_dir().join(WEB_MANIFEST_FILENAME)
    }
}
