//! Per-platform favicon designs.
//!
//! Each supported surface gets one compiler function that maps its slice of
//! [`EffectiveOptions`] to the design structure the generation service
//! expects. All of them share two fallbacks (background color and margin)
//! and a handful of identity fields, carried in [`SharedDesign`].
//!
//! ## Picture aspect
//!
//! Every platform that supports a margin picks its picture aspect the same
//! way, differing only in which visual modifier it knows about:
//!
//! ```text
//! modifier flag set (silhouette / drop shadow)  →  modifier aspect
//! else own or inherited margin is set           →  background_and_margin
//! else                                          →  no_change
//! ```
//!
//! A platform's own margin or color wins only when it is set; `0` and `""`
//! count as unset and fall through to the shared default.
//!
//! ## Unset fields
//!
//! Unset fields serialize as `null` and are removed by
//! [`strip_unset`](crate::filter::strip_unset) in [`PlatformDesign::to_value`].
//! Nothing in this module decides what gets omitted on the wire.

use crate::config::{Display, EffectiveOptions, Margin, Orientation, Ratio, StartupImageOptions};
use crate::filter::to_filtered_value;
use crate::request::CompileError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// Conflict policy sent alongside an existing manifest.
const ON_CONFLICT_OVERRIDE: &str = "override";

/// Reference to a master picture: either a URL the service fetches or the
/// base64 content of a local file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MasterPicture {
    Url { url: String },
    Inline { content: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PictureAspect {
    NoChange,
    BackgroundAndMargin,
    WhiteSilhouette,
    Silhouette,
    Shadow,
}

/// Reads local pictures and manifests, resolving relative paths against a
/// base directory.
#[derive(Debug, Clone)]
pub struct AssetReader {
    base_dir: PathBuf,
}

impl AssetReader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Absolute path for a configured path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let joined = self.base_dir.join(path);
        std::path::absolute(&joined).unwrap_or(joined)
    }

    /// Reference to a picture: remote URLs are passed through for the
    /// service to fetch, local files are read and encoded inline.
    pub fn picture(&self, path: &str) -> Result<MasterPicture, CompileError> {
        if path.starts_with("https://") || path.starts_with("http://") {
            return Ok(MasterPicture::Url {
                url: path.to_string(),
            });
        }
        let full = self.resolve(path);
        let bytes = std::fs::read(&full).map_err(|source| CompileError::ReadFile {
            path: full.clone(),
            source,
        })?;
        Ok(MasterPicture::Inline {
            content: BASE64.encode(bytes),
        })
    }

    /// Read a text file (an existing manifest) as-is.
    pub fn read_text(&self, path: &str) -> Result<String, CompileError> {
        let full = self.resolve(path);
        std::fs::read_to_string(&full).map_err(|source| CompileError::ReadFile {
            path: full.clone(),
            source,
        })
    }

    /// Inline a platform-specific picture if one is configured.
    fn optional_picture(&self, path: Option<&str>) -> Result<Option<MasterPicture>, CompileError> {
        non_empty(path)
            .map(|p| self.picture(p))
            .transpose()
    }
}

/// Fallbacks and identity fields shared by every platform compiler.
#[derive(Debug, Clone, Copy)]
pub struct SharedDesign<'a> {
    pub app_name: &'a str,
    pub theme_color: &'a str,
    pub start_url: Option<&'a str>,
    pub display: Option<Display>,
    pub force_orientation: Option<Orientation>,
    pub default_background_color: Option<&'a str>,
    pub default_margin: Option<&'a Margin>,
}

impl<'a> SharedDesign<'a> {
    pub fn from_options(options: &'a EffectiveOptions) -> Self {
        Self {
            app_name: &options.app_name,
            theme_color: &options.theme_color,
            start_url: options.start_url.as_deref(),
            display: options.display,
            force_orientation: options.force_orientation,
            default_background_color: options.default_background_color.as_deref(),
            default_margin: options.default_margin.as_ref(),
        }
    }

    /// The platform's own margin if set, else the shared default.
    pub fn margin(&self, own: Option<&Margin>) -> Option<Margin> {
        match own {
            Some(m) if m.is_set() => Some(m.clone()),
            _ => self.default_margin.cloned(),
        }
    }

    /// The platform's own background color if set, else the shared default.
    pub fn background_color(&self, own: Option<&str>) -> Option<String> {
        non_empty(own)
            .or(self.default_background_color)
            .map(str::to_string)
    }
}

/// Pick the picture aspect: modifier first, then margin, then no change.
pub fn select_aspect(modifier: Option<PictureAspect>, margin: Option<&Margin>) -> PictureAspect {
    match modifier {
        Some(aspect) => aspect,
        None if margin.is_some_and(Margin::is_set) => PictureAspect::BackgroundAndMargin,
        None => PictureAspect::NoChange,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn flag(value: Option<bool>, aspect: PictureAspect) -> Option<PictureAspect> {
    value.unwrap_or(false).then_some(aspect)
}

// =============================================================================
// Design structures
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct IosDesign {
    pub master_picture: Option<MasterPicture>,
    pub picture_aspect: PictureAspect,
    pub margin: Option<Margin>,
    pub background_color: Option<String>,
    pub startup_image: Option<StartupImageDesign>,
    pub assets: IosAssets,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartupImageDesign {
    pub master_picture: Option<MasterPicture>,
    pub picture_aspect: PictureAspect,
    pub background_color: Option<String>,
    pub margin: Option<Margin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IosAssets {
    pub ios6_and_prior_icons: Option<bool>,
    pub ios7_and_later_icons: bool,
    pub precomposed_icons: Option<bool>,
    pub declare_only_default_icon: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowsDesign {
    pub master_picture: Option<MasterPicture>,
    pub picture_aspect: PictureAspect,
    pub background_color: Option<String>,
    pub assets: WindowsAssets,
    pub app_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowsAssets {
    pub windows_80_ie_10_tile: bool,
    pub windows_10_ie_11_edge_tiles: WindowsTiles,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowsTiles {
    pub small: bool,
    pub medium: bool,
    pub big: bool,
    pub rectangle: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AndroidChromeDesign {
    pub master_picture: Option<MasterPicture>,
    pub picture_aspect: PictureAspect,
    pub margin: Option<Margin>,
    pub background_color: Option<String>,
    pub theme_color: String,
    pub manifest: AndroidManifest,
    pub assets: AndroidAssets,
}

#[derive(Debug, Clone, Serialize)]
pub struct AndroidManifest {
    pub name: String,
    pub display: Option<Display>,
    pub orientation: Option<Orientation>,
    pub start_url: Option<String>,
    /// Raw text of an existing manifest to merge with.
    pub existing_manifest: Option<String>,
    pub on_conflict: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AndroidAssets {
    pub legacy_icon: Option<bool>,
    pub low_resolution_icons: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SafariPinnedTabDesign {
    pub master_picture: Option<MasterPicture>,
    pub picture_aspect: PictureAspect,
    pub margin: Option<Margin>,
    pub background_color: Option<String>,
    pub theme_color: String,
    pub threshold: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenGraphDesign {
    pub master_picture: Option<MasterPicture>,
    pub picture_aspect: PictureAspect,
    pub margin: Option<Margin>,
    pub background_color: Option<String>,
    pub ratio: Option<Ratio>,
}

/// A compiled design for one platform.
#[derive(Debug, Clone)]
pub enum PlatformDesign {
    /// Plain desktop favicons. Always requested, takes no settings.
    DesktopBrowser,
    Ios(IosDesign),
    Windows(WindowsDesign),
    AndroidChrome(AndroidChromeDesign),
    SafariPinnedTab(SafariPinnedTabDesign),
    OpenGraph(OpenGraphDesign),
}

impl PlatformDesign {
    /// Key of this design under `favicon_design` in the request.
    pub fn key(&self) -> &'static str {
        match self {
            PlatformDesign::DesktopBrowser => "desktop_browser",
            PlatformDesign::Ios(_) => "ios",
            PlatformDesign::Windows(_) => "windows",
            PlatformDesign::AndroidChrome(_) => "android_chrome",
            PlatformDesign::SafariPinnedTab(_) => "safari_pinned_tab",
            PlatformDesign::OpenGraph(_) => "open_graph",
        }
    }

    /// Serialize with unset fields removed.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            PlatformDesign::DesktopBrowser => Ok(Value::Object(Default::default())),
            PlatformDesign::Ios(d) => to_filtered_value(d),
            PlatformDesign::Windows(d) => to_filtered_value(d),
            PlatformDesign::AndroidChrome(d) => to_filtered_value(d),
            PlatformDesign::SafariPinnedTab(d) => to_filtered_value(d),
            PlatformDesign::OpenGraph(d) => to_filtered_value(d),
        }
    }
}

// =============================================================================
// Compilers
// =============================================================================

/// Compile every enabled platform, desktop first.
///
/// Any unreadable picture or manifest fails the whole compile.
pub fn compile_designs(
    options: &EffectiveOptions,
    reader: &AssetReader,
) -> Result<Vec<PlatformDesign>, CompileError> {
    let shared = SharedDesign::from_options(options);
    let mut designs = vec![PlatformDesign::DesktopBrowser];

    if options.ios.enabled {
        designs.push(PlatformDesign::Ios(compile_ios(options, &shared, reader)?));
    }
    if options.windows.enabled {
        designs.push(PlatformDesign::Windows(compile_windows(options, &shared, reader)?));
    }
    if options.android.enabled {
        designs.push(PlatformDesign::AndroidChrome(compile_android(
            options, &shared, reader,
        )?));
    }
    if options.safari_pinned_tab.enabled {
        designs.push(PlatformDesign::SafariPinnedTab(compile_safari_pinned_tab(
            options, &shared, reader,
        )?));
    }
    if options.open_graph.enabled {
        designs.push(PlatformDesign::OpenGraph(compile_open_graph(
            options, &shared, reader,
        )?));
    }

    Ok(designs)
}

pub fn compile_ios(
    options: &EffectiveOptions,
    shared: &SharedDesign<'_>,
    reader: &AssetReader,
) -> Result<IosDesign, CompileError> {
    let ios = &options.ios;
    let margin = shared.margin(ios.margin.as_ref());
    let startup_image = ios
        .startup_image
        .as_ref()
        .map(|startup| compile_startup_image(startup, reader))
        .transpose()?;

    Ok(IosDesign {
        master_picture: reader.optional_picture(ios.master_picture.as_deref())?,
        picture_aspect: select_aspect(None, margin.as_ref()),
        margin,
        background_color: shared.background_color(ios.background_color.as_deref()),
        startup_image,
        assets: IosAssets {
            ios6_and_prior_icons: ios.legacy_icons,
            ios7_and_later_icons: true,
            precomposed_icons: ios.precomposed_icons,
            declare_only_default_icon: ios.only_default_icons,
        },
    })
}

/// The startup image uses only its own margin and color, never the shared ones.
fn compile_startup_image(
    startup: &StartupImageOptions,
    reader: &AssetReader,
) -> Result<StartupImageDesign, CompileError> {
    Ok(StartupImageDesign {
        master_picture: reader.optional_picture(startup.master_picture.as_deref())?,
        picture_aspect: select_aspect(None, startup.margin.as_ref()),
        background_color: startup.background_color.clone(),
        margin: startup.margin.clone(),
    })
}

/// Windows tiles have no margin; the only aspect choice is the silhouette.
pub fn compile_windows(
    options: &EffectiveOptions,
    shared: &SharedDesign<'_>,
    reader: &AssetReader,
) -> Result<WindowsDesign, CompileError> {
    let windows = &options.windows;
    Ok(WindowsDesign {
        master_picture: reader.optional_picture(windows.master_picture.as_deref())?,
        picture_aspect: select_aspect(
            flag(windows.silhouette, PictureAspect::WhiteSilhouette),
            None,
        ),
        background_color: shared.background_color(windows.background_color.as_deref()),
        assets: WindowsAssets {
            windows_80_ie_10_tile: true,
            windows_10_ie_11_edge_tiles: WindowsTiles {
                small: true,
                medium: true,
                big: true,
                rectangle: true,
            },
        },
        app_name: shared.app_name.to_string(),
    })
}

pub fn compile_android(
    options: &EffectiveOptions,
    shared: &SharedDesign<'_>,
    reader: &AssetReader,
) -> Result<AndroidChromeDesign, CompileError> {
    let android = &options.android;
    let margin = shared.margin(android.margin.as_ref());
    let existing_manifest_path = non_empty(android.existing_manifest.as_deref());
    let existing_manifest = existing_manifest_path
        .map(|path| reader.read_text(path))
        .transpose()?;

    Ok(AndroidChromeDesign {
        master_picture: reader.optional_picture(android.master_picture.as_deref())?,
        picture_aspect: select_aspect(
            flag(android.drop_shadow, PictureAspect::Shadow),
            margin.as_ref(),
        ),
        margin,
        background_color: shared.background_color(android.background_color.as_deref()),
        theme_color: shared.theme_color.to_string(),
        manifest: AndroidManifest {
            name: shared.app_name.to_string(),
            display: shared.display,
            orientation: shared.force_orientation,
            start_url: shared.start_url.map(str::to_string),
            on_conflict: existing_manifest_path.map(|_| ON_CONFLICT_OVERRIDE),
            existing_manifest,
        },
        assets: AndroidAssets {
            legacy_icon: android.legacy_icons,
            low_resolution_icons: android.low_res_icons,
        },
    })
}

pub fn compile_safari_pinned_tab(
    options: &EffectiveOptions,
    shared: &SharedDesign<'_>,
    reader: &AssetReader,
) -> Result<SafariPinnedTabDesign, CompileError> {
    let safari = &options.safari_pinned_tab;
    let margin = shared.margin(safari.margin.as_ref());
    Ok(SafariPinnedTabDesign {
        master_picture: reader.optional_picture(safari.master_picture.as_deref())?,
        picture_aspect: select_aspect(
            flag(safari.silhouette, PictureAspect::Silhouette),
            margin.as_ref(),
        ),
        margin,
        background_color: shared.background_color(safari.background_color.as_deref()),
        theme_color: shared.theme_color.to_string(),
        threshold: safari.threshold,
    })
}

pub fn compile_open_graph(
    options: &EffectiveOptions,
    shared: &SharedDesign<'_>,
    reader: &AssetReader,
) -> Result<OpenGraphDesign, CompileError> {
    let og = &options.open_graph;
    let margin = shared.margin(og.margin.as_ref());
    Ok(OpenGraphDesign {
        master_picture: reader.optional_picture(og.master_picture.as_deref())?,
        picture_aspect: select_aspect(None, margin.as_ref()),
        margin,
        background_color: shared.background_color(og.background_color.as_deref()),
        ratio: og.ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use base64::Engine as _;
    use serde_json::json;
    use std::fs;

    fn compile(toml_extra: &str) -> (Vec<PlatformDesign>, tempfile::TempDir) {
        let site = setup_site();
        let options = options_with(toml_extra);
        let reader = AssetReader::new(site.path());
        (compile_designs(&options, &reader).unwrap(), site)
    }

    fn design_value(designs: &[PlatformDesign], key: &str) -> Value {
        designs
            .iter()
            .find(|d| d.key() == key)
            .unwrap_or_else(|| panic!("no {key} design"))
            .to_value()
            .unwrap()
    }

    // =========================================================================
    // Aspect selection
    // =========================================================================

    #[test]
    fn select_aspect_modifier_beats_margin() {
        assert_eq!(
            select_aspect(Some(PictureAspect::Silhouette), Some(&Margin::Integer(10))),
            PictureAspect::Silhouette
        );
    }

    #[test]
    fn select_aspect_margin_without_modifier() {
        assert_eq!(
            select_aspect(None, Some(&Margin::Text("5%".into()))),
            PictureAspect::BackgroundAndMargin
        );
    }

    #[test]
    fn select_aspect_zero_margin_is_no_change() {
        assert_eq!(
            select_aspect(None, Some(&Margin::Integer(0))),
            PictureAspect::NoChange
        );
        assert_eq!(select_aspect(None, None), PictureAspect::NoChange);
    }

    // =========================================================================
    // Shared fallbacks
    // =========================================================================

    #[test]
    fn own_margin_wins_when_set() {
        let opts = options_with("default_margin = 8");
        let shared = SharedDesign::from_options(&opts);
        assert_eq!(shared.margin(Some(&Margin::Integer(2))), Some(Margin::Integer(2)));
    }

    #[test]
    fn zero_margin_falls_through_to_default() {
        let opts = options_with("default_margin = 8");
        let shared = SharedDesign::from_options(&opts);
        assert_eq!(shared.margin(Some(&Margin::Integer(0))), Some(Margin::Integer(8)));
    }

    #[test]
    fn zero_margin_without_default_is_unset() {
        let opts = options_with("");
        let shared = SharedDesign::from_options(&opts);
        assert_eq!(shared.margin(Some(&Margin::Integer(0))), None);
    }

    #[test]
    fn empty_background_color_falls_through() {
        let opts = options_with("default_background_color = \"#000000\"");
        let shared = SharedDesign::from_options(&opts);
        assert_eq!(shared.background_color(Some("")).as_deref(), Some("#000000"));
        assert_eq!(shared.background_color(Some("#fff")).as_deref(), Some("#fff"));
    }

    // =========================================================================
    // Platform selection
    // =========================================================================

    #[test]
    fn default_platforms_compiled() {
        let (designs, _site) = compile("");
        let keys: Vec<_> = designs.iter().map(PlatformDesign::key).collect();
        assert_eq!(
            keys,
            vec!["desktop_browser", "ios", "windows", "android_chrome", "safari_pinned_tab"]
        );
    }

    #[test]
    fn disabled_platforms_are_left_out() {
        let (designs, _site) = compile(
            "[ios]\nenabled = false\n[windows]\nenabled = false\n[open_graph]\nenabled = true",
        );
        let keys: Vec<_> = designs.iter().map(PlatformDesign::key).collect();
        assert_eq!(
            keys,
            vec!["desktop_browser", "android_chrome", "safari_pinned_tab", "open_graph"]
        );
    }

    #[test]
    fn desktop_design_is_empty_object() {
        let (designs, _site) = compile("");
        assert_eq!(design_value(&designs, "desktop_browser"), json!({}));
    }

    // =========================================================================
    // iOS
    // =========================================================================

    #[test]
    fn ios_defaults() {
        let (designs, _site) = compile("");
        assert_eq!(
            design_value(&designs, "ios"),
            json!({
                "picture_aspect": "no_change",
                "assets": {
                    "ios6_and_prior_icons": false,
                    "ios7_and_later_icons": true,
                    "precomposed_icons": true,
                    "declare_only_default_icon": true
                }
            })
        );
    }

    #[test]
    fn ios_inherits_default_margin_and_color() {
        let (designs, _site) =
            compile("default_margin = \"10%\"\ndefault_background_color = \"#abcdef\"");
        let ios = design_value(&designs, "ios");
        assert_eq!(ios["picture_aspect"], "background_and_margin");
        assert_eq!(ios["margin"], "10%");
        assert_eq!(ios["background_color"], "#abcdef");
    }

    #[test]
    fn ios_startup_image_ignores_shared_fallbacks() {
        let (designs, _site) = compile(
            "default_margin = 6\ndefault_background_color = \"#111111\"\n\
             [ios.startup_image]\nmaster_picture = \"splash.png\"",
        );
        let startup = &design_value(&designs, "ios")["startup_image"];
        assert_eq!(startup["picture_aspect"], "no_change");
        assert!(startup.get("margin").is_none());
        assert!(startup.get("background_color").is_none());
        assert_eq!(startup["master_picture"]["type"], "inline");
    }

    #[test]
    fn ios_startup_image_margin_selects_aspect() {
        let (designs, _site) = compile("[ios.startup_image]\nmargin = 12");
        let startup = &design_value(&designs, "ios")["startup_image"];
        assert_eq!(startup["picture_aspect"], "background_and_margin");
        assert_eq!(startup["margin"], 12);
        assert!(startup.get("master_picture").is_none());
    }

    #[test]
    fn ios_master_picture_is_inlined() {
        let (designs, _site) = compile("[ios]\nmaster_picture = \"splash.png\"");
        let ios = design_value(&designs, "ios");
        assert_eq!(
            ios["master_picture"],
            json!({"type": "inline", "content": BASE64.encode(SPLASH_BYTES)})
        );
    }

    // =========================================================================
    // Windows
    // =========================================================================

    #[test]
    fn windows_silhouette() {
        let (designs, _site) = compile("default_margin = 4\n[windows]\nsilhouette = true");
        let windows = design_value(&designs, "windows");
        assert_eq!(windows["picture_aspect"], "white_silhouette");
        assert!(windows.get("margin").is_none());
        assert_eq!(windows["app_name"], "Test Site");
        assert_eq!(windows["assets"]["windows_10_ie_11_edge_tiles"]["rectangle"], true);
    }

    #[test]
    fn windows_ignores_margin_for_aspect() {
        let (designs, _site) = compile("default_margin = 4");
        assert_eq!(design_value(&designs, "windows")["picture_aspect"], "no_change");
    }

    // =========================================================================
    // Android
    // =========================================================================

    #[test]
    fn android_drop_shadow_beats_margin() {
        let (designs, _site) = compile("[android]\ndrop_shadow = true\nmargin = 10");
        let android = design_value(&designs, "android_chrome");
        assert_eq!(android["picture_aspect"], "shadow");
        assert_eq!(android["margin"], 10);
    }

    #[test]
    fn android_manifest_fields() {
        let (designs, _site) = compile("force_orientation = \"portrait\"");
        let android = design_value(&designs, "android_chrome");
        assert_eq!(
            android["manifest"],
            json!({
                "name": "Test Site",
                "display": "standalone",
                "orientation": "portrait",
                "start_url": "/"
            })
        );
        assert_eq!(android["theme_color"], "#336699");
        assert_eq!(
            android["assets"],
            json!({"legacy_icon": false, "low_resolution_icons": false})
        );
    }

    #[test]
    fn android_existing_manifest_sets_conflict_policy() {
        let site = setup_site();
        fs::write(site.path().join("manifest.json"), r#"{"name":"old"}"#).unwrap();
        let options = options_with("[android]\nexisting_manifest = \"manifest.json\"");
        let reader = AssetReader::new(site.path());
        let design = compile_android(&options, &SharedDesign::from_options(&options), &reader)
            .unwrap();
        assert_eq!(design.manifest.existing_manifest.as_deref(), Some(r#"{"name":"old"}"#));
        assert_eq!(design.manifest.on_conflict, Some("override"));
    }

    #[test]
    fn android_missing_manifest_fails_compile() {
        let site = setup_site();
        let options = options_with("[android]\nexisting_manifest = \"missing.json\"");
        let result = compile_designs(&options, &AssetReader::new(site.path()));
        assert!(matches!(result, Err(CompileError::ReadFile { .. })));
    }

    // =========================================================================
    // Safari pinned tab
    // =========================================================================

    #[test]
    fn safari_silhouette_beats_margin() {
        let (designs, _site) = compile("[safari_pinned_tab]\nmargin = 10");
        let safari = design_value(&designs, "safari_pinned_tab");
        assert_eq!(safari["picture_aspect"], "silhouette");
        assert_eq!(safari["threshold"], 60);
        assert_eq!(safari["margin"], 10);
    }

    #[test]
    fn safari_margin_when_silhouette_off() {
        let (designs, _site) = compile("default_margin = 3\n[safari_pinned_tab]\nsilhouette = false");
        let safari = design_value(&designs, "safari_pinned_tab");
        assert_eq!(safari["picture_aspect"], "background_and_margin");
        assert_eq!(safari["margin"], 3);
    }

    // =========================================================================
    // Open Graph
    // =========================================================================

    #[test]
    fn open_graph_ratio_and_margin() {
        let (designs, _site) =
            compile("[open_graph]\nenabled = true\nratio = \"1.91:1\"\nmargin = \"5%\"");
        assert_eq!(
            design_value(&designs, "open_graph"),
            json!({
                "picture_aspect": "background_and_margin",
                "margin": "5%",
                "ratio": "1.91:1"
            })
        );
    }

    #[test]
    fn missing_platform_picture_fails_compile() {
        let site = setup_site();
        let options = options_with("[open_graph]\nenabled = true\nmaster_picture = \"og.png\"");
        let result = compile_designs(&options, &AssetReader::new(site.path()));
        match result {
            Err(CompileError::ReadFile { path, .. }) => assert!(path.ends_with("og.png")),
            other => panic!("expected ReadFile error, got {other:?}"),
        }
    }

    #[test]
    fn remote_picture_is_passed_as_url() {
        let (designs, _site) =
            compile("[windows]\nmaster_picture = \"https://cdn.test/tile.png\"");
        assert_eq!(
            design_value(&designs, "windows")["master_picture"],
            json!({"type": "url", "url": "https://cdn.test/tile.png"})
        );
    }

    #[test]
    fn resolve_makes_paths_absolute() {
        let reader = AssetReader::new("some/dir");
        assert!(reader.resolve("icon.png").is_absolute());
    }
}
