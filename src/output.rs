//! CLI output formatting.
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Compile
//!
//! ```text
//! Platforms
//! 001 desktop_browser
//! 002 ios
//!     Aspect: background_and_margin
//!     Margin: 10%
//! 003 windows
//!     Aspect: white_silhouette
//!
//! Digest: 3f2a9c1b2d4e
//! ```
//!
//! ## Build
//!
//! ```text
//! Request 3f2a9c1b2d4e (stale)
//!     Generated 24 files
//! Published 25 files → public/favicons
//!     favicon.ico → public/favicon.ico
//!     Manifest: transformed
//! ```

use crate::gate::{GateReport, Outcome};
use crate::paths::BuildPaths;
use crate::publish::{ManifestStatus, PublishReport};
use crate::request::CompiledRequest;
use serde_json::Value;

/// Number of digest characters shown in summaries.
const SHORT_DIGEST_LEN: usize = 12;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn short_digest(digest: &str) -> &str {
    digest.get(..SHORT_DIGEST_LEN).unwrap_or(digest)
}

/// Render a scalar design value for display (strings without quotes).
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Format the compiled platforms and the request digest.
pub fn format_compile_output(request: &CompiledRequest, digest: &str) -> Vec<String> {
    let mut lines = vec!["Platforms".to_string()];
    for (i, platform) in request.platforms().iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), platform));
        let design = request.pointer(&format!("/favicon_design/{platform}"));
        for (label, key) in [("Aspect", "picture_aspect"), ("Margin", "margin")] {
            if let Some(value) = design.and_then(|d| d.get(key)) {
                lines.push(format!("    {}: {}", label, display_value(value)));
            }
        }
    }
    lines.push(String::new());
    lines.push(format!("Digest: {}", short_digest(digest)));
    lines
}

pub fn print_compile_output(request: &CompiledRequest, digest: &str) {
    for line in format_compile_output(request, digest) {
        println!("{}", line);
    }
}

/// Format what the cache gate decided and how the generation call went.
pub fn format_gate_report(report: &GateReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Request {} ({})",
        short_digest(&report.digest),
        report.freshness
    )];
    match &report.outcome {
        Outcome::Skipped => lines.push("    Skipped: favicons up to date".to_string()),
        Outcome::Generated(result) => {
            let count = result
                .favicon
                .as_ref()
                .map(|f| f.files_urls.len())
                .unwrap_or(0);
            lines.push(format!("    Generated {} files", count));
            if let Some(preview) = &result.preview_picture_url {
                lines.push(format!("    Preview: {}", preview));
            }
        }
        Outcome::Failed(err) => {
            lines.push(format!("    Failed: {}", err));
            lines.push("    Keeping previously generated favicons".to_string());
        }
    }
    lines
}

/// Format the publish step.
pub fn format_publish_report(report: &PublishReport, paths: &BuildPaths) -> Vec<String> {
    if report.files_copied == 0 {
        return vec!["Nothing to publish".to_string()];
    }
    let mut lines = vec![format!(
        "Published {} files → {}",
        report.files_copied,
        paths.public_favicons_dir().display()
    )];
    if report.root_favicon {
        lines.push(format!(
            "    favicon.ico → {}",
            paths.public_dir.join("favicon.ico").display()
        ));
    }
    match report.manifest {
        ManifestStatus::Untouched => {}
        ManifestStatus::Transformed => lines.push("    Manifest: transformed".to_string()),
        ManifestStatus::TransformEmpty => {
            lines.push("    Manifest: transform returned nothing, kept as generated".to_string())
        }
    }
    lines
}

pub fn print_build_output(gate: &GateReport, publish: &PublishReport, paths: &BuildPaths) {
    for line in format_gate_report(gate)
        .into_iter()
        .chain(format_publish_report(publish, paths))
    {
        println!("{}", line);
    }
}
