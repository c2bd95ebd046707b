//! Request assembly.
//!
//! Combines the primary master picture, the delivery location, the compiled
//! platform designs, and generation settings into the single JSON request the
//! generation service accepts. Each top-level key of the user's
//! `request_override` table replaces the derived value of the same key
//! outright, so it wins over everything compiled before it.
//!
//! ```text
//! {
//!   "api_key": "...",
//!   "master_picture": {"type": "inline", "content": "<base64>"},
//!   "files_location": {"type": "path", "path": "/favicons"},
//!   "favicon_design": {"desktop_browser": {}, "ios": {...}, ...},
//!   "settings": {"compression": 3, "scaling_algorithm": "Lanczos", ...},
//!   "versioning": {"param_name": "version", "param_value": "<digest>"}
//! }
//! ```
//!
//! `versioning` is only attached right before the service call, after the
//! request has been fingerprinted.

use crate::config::{ConfigError, EffectiveOptions, ScalingAlgorithm};
use crate::design::{AssetReader, compile_designs};
use crate::paths::PUBLIC_PATH;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Query parameter appended to generated asset URLs for cache busting.
pub const VERSION_PARAM: &str = "version";

const DEFAULT_COMPRESSION: u32 = 3;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the service should expect the generated files to be served from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesLocation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FilesLocation {
    pub fn at_path(path: &str) -> Self {
        Self {
            kind: "path".to_string(),
            path: Some(path.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub compression: u32,
    pub scaling_algorithm: ScalingAlgorithm,
    pub error_on_image_too_small: bool,
    pub readme_file: bool,
    pub html_code_file: bool,
    pub use_path_as_is: bool,
}

impl Settings {
    /// Settings from options. A compression of 0 counts as unset.
    pub fn from_options(options: &EffectiveOptions) -> Self {
        Self {
            compression: options
                .compression
                .filter(|c| *c != 0)
                .unwrap_or(DEFAULT_COMPRESSION),
            scaling_algorithm: options
                .scaling_algorithm
                .unwrap_or(ScalingAlgorithm::Lanczos),
            error_on_image_too_small: true,
            readme_file: false,
            html_code_file: false,
            use_path_as_is: false,
        }
    }
}

/// The full request sent to the generation service.
///
/// Kept as a JSON object rather than a struct: the user override may add or
/// replace arbitrary fields, and all of them must reach the service and the
/// fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledRequest(Map<String, Value>);

impl CompiledRequest {
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a nested value by JSON pointer, e.g. `/settings/compression`.
    ///
    /// The first token is unescaped here (`~1` → `/`, then `~0` → `~`); the
    /// rest of the pointer goes to [`Value::pointer`].
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (first, tail) = match rest.split_once('/') {
            Some((first, tail)) => (first, Some(tail)),
            None => (rest, None),
        };
        let value = self.0.get(&first.replace("~1", "/").replace("~0", "~"))?;
        match tail {
            Some(tail) => value.pointer(&format!("/{tail}")),
            None => Some(value),
        }
    }

    /// Platform keys present under `favicon_design`, in key order.
    pub fn platforms(&self) -> Vec<&str> {
        self.0
            .get("favicon_design")
            .and_then(Value::as_object)
            .map(|designs| designs.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Attach the cache-busting version parameter.
    pub fn with_versioning(mut self, digest: &str) -> Self {
        self.0.insert(
            "versioning".to_string(),
            json!({"param_name": VERSION_PARAM, "param_value": digest}),
        );
        self
    }
}

/// Recursively merge `overlay` on top of `base`.
///
/// Objects are merged key-by-key; anything else in `overlay` (including
/// arrays) replaces the base value outright.
pub fn merge_json(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => merge_json(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Compile options into the request sent to the generation service.
///
/// Relative picture and manifest paths are resolved against `base_dir`.
/// Fails on invalid options or any unreadable local file; there is no
/// partial result.
pub fn assemble(options: &EffectiveOptions, base_dir: &Path) -> Result<CompiledRequest, CompileError> {
    options.validate()?;
    let reader = AssetReader::new(base_dir);

    let master_picture = reader.picture(&options.master_picture)?;

    let mut favicon_design = Map::new();
    for design in compile_designs(options, &reader)? {
        favicon_design.insert(design.key().to_string(), design.to_value()?);
    }

    let mut request = Map::new();
    request.insert("api_key".into(), Value::String(options.api_key.clone()));
    request.insert("master_picture".into(), serde_json::to_value(master_picture)?);
    request.insert(
        "files_location".into(),
        serde_json::to_value(FilesLocation::at_path(PUBLIC_PATH))?,
    );
    request.insert("favicon_design".into(), Value::Object(favicon_design));
    request.insert(
        "settings".into(),
        serde_json::to_value(Settings::from_options(options))?,
    );

    if let Some(overrides) = &options.request_override {
        for (key, value) in overrides {
            request.insert(key.clone(), value.clone());
        }
    }

    Ok(CompiledRequest(request))
}
