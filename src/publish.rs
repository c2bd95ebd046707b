//! Publishing generated favicons into the public directory.
//!
//! Runs after the gate on every build, whether or not the service was
//! called: the cache dir holds the last good package, and this copies it to
//! where the site is served from.
//!
//! - `<cache>/**` → `<public>/favicons/**` (including `response.json`)
//! - `<cache>/favicon.ico` → `<public>/favicon.ico`, for browsers that only
//!   look at the site root
//! - optionally, `site.webmanifest` is passed through a caller-supplied
//!   transform and the result replaces the public copy
//!
//! The head markup the service returned is read back from the public
//! `response.json` by [`head_markup`].

use crate::digest::canonical_json;
use crate::paths::{BuildPaths, FAVICON_ICO_FILENAME};
use crate::service::GenerationResult;
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to walk {0}")]
    Walk(#[from] walkdir::Error),
}

/// Rewrites a parsed web manifest. Returning `None` leaves the manifest as
/// generated.
pub type ManifestTransform<'a> = &'a dyn Fn(Value) -> Option<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestStatus {
    /// No transform was supplied, or there is no manifest to transform.
    Untouched,
    Transformed,
    /// The transform returned nothing; the generated manifest was kept.
    TransformEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub files_copied: usize,
    pub root_favicon: bool,
    pub manifest: ManifestStatus,
}

/// Copy the cached package into the public directory.
///
/// A missing cache dir (no generation has succeeded yet) is not an error;
/// nothing is copied.
pub fn publish(
    paths: &BuildPaths,
    transform: Option<ManifestTransform<'_>>,
) -> Result<PublishReport, PublishError> {
    if !paths.cache_dir.is_dir() {
        warn!(
            cache_dir = %paths.cache_dir.display(),
            "No generated favicons to publish"
        );
        return Ok(PublishReport {
            files_copied: 0,
            root_favicon: false,
            manifest: ManifestStatus::Untouched,
        });
    }

    let files_copied = copy_dir_recursive(&paths.cache_dir, &paths.public_favicons_dir())?;

    let cached_ico = paths.cache_dir.join(FAVICON_ICO_FILENAME);
    let root_favicon = cached_ico.is_file();
    if root_favicon {
        fs::copy(&cached_ico, paths.public_dir.join(FAVICON_ICO_FILENAME))?;
    }

    let manifest = match transform {
        Some(transform) if paths.cached_manifest().is_file() => {
            transform_manifest(paths, transform)?
        }
        _ => ManifestStatus::Untouched,
    };

    Ok(PublishReport {
        files_copied,
        root_favicon,
        manifest,
    })
}

fn transform_manifest(
    paths: &BuildPaths,
    transform: ManifestTransform<'_>,
) -> Result<ManifestStatus, PublishError> {
    let original: Value = serde_json::from_str(&fs::read_to_string(paths.cached_manifest())?)?;
    match transform(original) {
        Some(transformed) => {
            fs::write(paths.public_manifest(), canonical_json(&transformed))?;
            info!("manifest transformed!");
            Ok(ManifestStatus::Transformed)
        }
        None => {
            warn!("Returned value of the manifest transform was empty.");
            Ok(ManifestStatus::TransformEmpty)
        }
    }
}

/// Copy every file under `src` into `dst`, keeping relative paths.
/// Returns the number of files copied.
fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, PublishError> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// The `<head>` snippet from a generation result, with its first newline
/// removed and surrounding whitespace trimmed.
pub fn html_head_snippet(result: &GenerationResult) -> Option<String> {
    result
        .favicon
        .as_ref()
        .map(|favicon| favicon.html_code.replacen('\n', "", 1).trim().to_string())
}

/// Read the head markup from the published `response.json`.
///
/// Returns `Ok(None)` with a warning when nothing has been published yet or
/// the response carries no favicon block.
pub fn head_markup(paths: &BuildPaths) -> Result<Option<String>, PublishError> {
    let response_path = paths.public_response();
    if !response_path.is_file() {
        warn!("Generation response does not exist. Skipping head markup.");
        return Ok(None);
    }
    let result: GenerationResult = serde_json::from_str(&fs::read_to_string(&response_path)?)?;
    let snippet = html_head_snippet(&result);
    if snippet.is_none() {
        warn!("Could not read favicon HTML from the generation response. Skipping head markup.");
    }
    Ok(snippet)
}
