//! Favicon configuration.
//!
//! Handles loading, normalizing, and validating `favicon.toml`. The user file is
//! sparse: every key is optional, and whatever is left out falls through to the
//! stock defaults.
//!
//! ## Config File
//!
//! ```toml
//! api_key = "..."                    # RealFaviconGenerator API key (required)
//! master_picture = "assets/icon.png" # Primary master picture (required)
//! app_name = "My Site"               # (required)
//! theme_color = "#336699"            # (required)
//! default_background_color = "#ffffff"
//! default_margin = "10%"             # Integer or CSS-ish string
//!
//! [ios]
//! margin = 4
//!
//! [ios.startup_image]
//! master_picture = "assets/splash.png"
//!
//! [windows]
//! silhouette = true
//!
//! [open_graph]
//! enabled = true
//! ratio = "1.91:1"
//! ```
//!
//! ## Normalization
//!
//! Normalization is a two-layer merge: the stock defaults (serialized from
//! [`EffectiveOptions::default`]) form the base, and the user table is merged
//! on top key-by-key with [`merge_toml`]. Only after merging is the result
//! deserialized, so every platform section in [`EffectiveOptions`] ends up
//! with a definite `enabled` flag.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Missing required option: {0}")]
    Missing(&'static str),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// The sparse, user-authored configuration tree, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOptions(toml::Table);

impl RawOptions {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(Self(toml::from_str(content)?))
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn from_table(table: toml::Table) -> Self {
        Self(table)
    }

    pub fn into_value(self) -> toml::Value {
        toml::Value::Table(self.0)
    }
}

/// A margin around the picture, as the generation service accepts it:
/// a plain number of pixels or a string such as `"10%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Margin {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Margin {
    /// Whether the margin counts as set. Zero and the empty string do not,
    /// so they fall through to the shared default margin.
    pub fn is_set(&self) -> bool {
        match self {
            Margin::Integer(n) => *n != 0,
            Margin::Float(n) => *n != 0.0 && !n.is_nan(),
            Margin::Text(s) => !s.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Standalone,
    Browser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Resampling algorithm used by the service when scaling the master picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingAlgorithm {
    Mitchell,
    NearestNeighbor,
    Cubic,
    Bilinear,
    Lanczos,
    Spline,
}

/// Open Graph image ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ratio {
    #[serde(rename = "1.91:1")]
    Wide,
    #[serde(rename = "square")]
    Square,
}

/// Options after the user config has been merged over the stock defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectiveOptions {
    /// RealFaviconGenerator API key.
    pub api_key: String,
    /// Path of the primary master picture.
    pub master_picture: String,
    /// Application name, used for Windows tiles and the web manifest.
    pub app_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,
    pub theme_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_orientation: Option<Orientation>,
    /// Background color inherited by every platform that doesn't set its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_background_color: Option<String>,
    /// Margin inherited by every platform that doesn't set its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_margin: Option<Margin>,
    /// Compression level (0-5). Zero means "use the default of 3".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling_algorithm: Option<ScalingAlgorithm>,
    pub ios: IosOptions,
    pub windows: WindowsOptions,
    pub android: AndroidOptions,
    pub safari_pinned_tab: SafariPinnedTabOptions,
    pub open_graph: OpenGraphOptions,
    /// Applied to the compiled request last. Each top-level key replaces the
    /// derived value of the same key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_override: Option<Map<String, Value>>,
    /// Merged into the generated `site.webmanifest` when publishing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_override: Option<Map<String, Value>>,
}

impl Default for EffectiveOptions {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            master_picture: String::new(),
            app_name: String::new(),
            start_url: Some("/".to_string()),
            theme_color: String::new(),
            display: Some(Display::Standalone),
            force_orientation: None,
            default_background_color: None,
            default_margin: None,
            compression: Some(3),
            scaling_algorithm: Some(ScalingAlgorithm::Lanczos),
            ios: IosOptions::default(),
            windows: WindowsOptions::default(),
            android: AndroidOptions::default(),
            safari_pinned_tab: SafariPinnedTabOptions::default(),
            open_graph: OpenGraphOptions::default(),
            request_override: None,
            manifest_override: None,
        }
    }
}

impl EffectiveOptions {
    /// Check required options and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }
        if self.master_picture.is_empty() {
            return Err(ConfigError::Missing("master_picture"));
        }
        if self.app_name.is_empty() {
            return Err(ConfigError::Missing("app_name"));
        }
        if self.theme_color.is_empty() {
            return Err(ConfigError::Missing("theme_color"));
        }
        if self.compression.is_some_and(|c| c > 5) {
            return Err(ConfigError::Validation("compression must be 0-5".into()));
        }
        if self.safari_pinned_tab.threshold.is_some_and(|t| t > 100) {
            return Err(ConfigError::Validation(
                "safari_pinned_tab.threshold must be 0-100".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IosOptions {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_image: Option<StartupImageOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_default_icons: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_icons: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precomposed_icons: Option<bool>,
}

impl Default for IosOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            master_picture: None,
            margin: None,
            background_color: None,
            startup_image: None,
            only_default_icons: Some(true),
            legacy_icons: Some(false),
            precomposed_icons: Some(true),
        }
    }
}

/// iOS startup (splash) image. Does not inherit the shared margin or color.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StartupImageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowsOptions {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silhouette: Option<bool>,
}

impl Default for WindowsOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            master_picture: None,
            background_color: None,
            silhouette: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AndroidOptions {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drop_shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_icons: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_res_icons: Option<bool>,
    /// Path to an existing web manifest the generated one is merged into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_manifest: Option<String>,
}

impl Default for AndroidOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            master_picture: None,
            margin: None,
            background_color: None,
            drop_shadow: None,
            legacy_icons: Some(false),
            low_res_icons: Some(false),
            existing_manifest: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafariPinnedTabOptions {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silhouette: Option<bool>,
}

impl Default for SafariPinnedTabOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            master_picture: None,
            background_color: None,
            margin: None,
            threshold: Some(60),
            silhouette: Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenGraphOptions {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<Ratio>,
}

// =============================================================================
// Normalization
// =============================================================================

/// Returns the stock default options as a `toml::Value::Table`.
///
/// This is the base layer every user config is merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(EffectiveOptions::default()).expect("default options must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge raw user options over the stock defaults.
///
/// Fails only when a value has the wrong type or a key is unknown; missing
/// required options are left for [`EffectiveOptions::validate`].
pub fn normalize(raw: RawOptions) -> Result<EffectiveOptions, ConfigError> {
    let merged = merge_toml(stock_defaults_value(), raw.into_value());
    Ok(merged.try_into()?)
}

/// Load, normalize, and validate a config file.
pub fn load_options(path: &Path) -> Result<EffectiveOptions, ConfigError> {
    let options = normalize(RawOptions::load(path)?)?;
    options.validate()?;
    Ok(options)
}

/// Returns a fully-commented stock `favicon.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Favicon Configuration
# =====================
# Only api_key, master_picture, app_name and theme_color are required.
# Everything else is optional; values shown below are the defaults.
# Relative paths are resolved against the directory of this file.
# Unknown keys will cause an error.

api_key = "your-realfavicongenerator-api-key"
master_picture = "assets/icon.png"
app_name = "My Site"
theme_color = "#ffffff"

start_url = "/"
display = "standalone"          # standalone | browser
# force_orientation = "portrait" # portrait | landscape

# Inherited by every platform that doesn't set its own value.
# A margin of 0 or "" counts as unset.
# default_background_color = "#ffffff"
# default_margin = "10%"

compression = 3                 # 0-5
scaling_algorithm = "Lanczos"   # Mitchell | NearestNeighbor | Cubic | Bilinear | Lanczos | Spline

# ---------------------------------------------------------------------------
# iOS home screen icons
# ---------------------------------------------------------------------------
[ios]
enabled = true
only_default_icons = true
legacy_icons = false
precomposed_icons = true
# master_picture = "assets/icon-ios.png"
# margin = 4
# background_color = "#ffffff"

# [ios.startup_image]
# master_picture = "assets/splash.png"
# margin = 10
# background_color = "#ffffff"

# ---------------------------------------------------------------------------
# Windows tiles
# ---------------------------------------------------------------------------
[windows]
enabled = true
# silhouette = true
# background_color = "#2b5797"

# ---------------------------------------------------------------------------
# Android / Chrome
# ---------------------------------------------------------------------------
[android]
enabled = true
legacy_icons = false
low_res_icons = false
# drop_shadow = true
# existing_manifest = "static/manifest.json"

# ---------------------------------------------------------------------------
# Safari pinned tab
# ---------------------------------------------------------------------------
[safari_pinned_tab]
enabled = true
silhouette = true
threshold = 60

# ---------------------------------------------------------------------------
# Open Graph image
# ---------------------------------------------------------------------------
[open_graph]
enabled = false
# ratio = "1.91:1"              # 1.91:1 | square

# ---------------------------------------------------------------------------
# Advanced
# ---------------------------------------------------------------------------
# Applied to the request sent to the service, after everything else.
# Each top-level key replaces the compiled value outright.
# [request_override.settings]
# compression = 5
# scaling_algorithm = "Lanczos"

# Merged into the generated site.webmanifest when publishing.
# [manifest_override]
# short_name = "Site"
"##
}
