//! The external favicon generation service.
//!
//! The [`FaviconGenerator`] trait is the one seam between this crate and the
//! network: it takes a compiled request and a destination directory, and
//! either fills the directory with generated files and returns the service's
//! [`GenerationResult`], or fails.
//!
//! The production implementation is [`RfgClient`], a blocking client for the
//! RealFaviconGenerator API. It has no timeout and no retry; a failed call is
//! reported to the caller immediately and the next build tries again.
//!
//! ```text
//! POST https://realfavicongenerator.net/api/favicon
//!   {"favicon_generation": <CompiledRequest>}
//! ← {"favicon_generation_result": <GenerationResult>}
//! GET  each favicon.files_urls[i]  →  <dest>/<last path segment>
//! ```

use crate::request::{CompiledRequest, FilesLocation};
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const API_ENDPOINT: &str = "https://realfavicongenerator.net/api/favicon";

const STATUS_SUCCESS: &str = "success";

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Request to generation service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Generation service responded {code} ({status_text})")]
    Status {
        code: u16,
        status_text: String,
        body: String,
    },
    #[error("Generation service rejected the request: {0}")]
    Rejected(String),
    #[error("Unusable file URL in generation result: {0}")]
    InvalidFileUrl(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// HTTP status description, when the failure came with one.
    pub fn status_text(&self) -> Option<&str> {
        match self {
            GenerationError::Status { status_text, .. } => Some(status_text),
            _ => None,
        }
    }
}

/// Outcome of one generation call, as returned by the service.
///
/// Persisted verbatim as `response.json`; later consumers read the HTML
/// snippet out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub result: ResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<FaviconPackage>,
    /// Absent from some error responses.
    #[serde(default)]
    pub files_location: FilesLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaviconPackage {
    pub package_url: String,
    /// Every generated file, in the order the service listed them.
    pub files_urls: Vec<String>,
    /// Markup to place in every page's `<head>`.
    pub html_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
    #[serde(default)]
    pub overlapping_markups: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    favicon_generation_result: GenerationResult,
}

/// Something that can turn a compiled request into generated favicon files.
pub trait FaviconGenerator {
    /// Generate the favicon package into `dest`, which already exists.
    fn generate(
        &self,
        request: &CompiledRequest,
        dest: &Path,
    ) -> Result<GenerationResult, GenerationError>;
}

/// Blocking client for the RealFaviconGenerator API.
///
/// Construct once and pass it by reference to every build that needs it.
#[derive(Debug, Clone)]
pub struct RfgClient {
    http: HttpClient,
    endpoint: String,
}

impl RfgClient {
    pub fn new() -> Result<Self, GenerationError> {
        let http = HttpClient::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            http,
            endpoint: API_ENDPOINT.to_string(),
        })
    }

    /// Use a preconfigured HTTP client, e.g. one with proxies disabled.
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    /// Point the client at a different API endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), GenerationError> {
        let name = file_name_from_url(url)
            .ok_or_else(|| GenerationError::InvalidFileUrl(url.to_string()))?;
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status {
                code: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: response.text().unwrap_or_default(),
            });
        }
        let bytes = response.bytes()?;
        debug!(file = %name, bytes = bytes.len(), "downloaded generated file");
        std::fs::write(dest.join(name), &bytes)?;
        Ok(())
    }
}

impl FaviconGenerator for RfgClient {
    fn generate(
        &self,
        request: &CompiledRequest,
        dest: &Path,
    ) -> Result<GenerationResult, GenerationError> {
        let body = json!({ "favicon_generation": request });
        let response = self.http.post(&self.endpoint).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status {
                code: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: response.text().unwrap_or_default(),
            });
        }

        let envelope: ResponseEnvelope = serde_json::from_str(&response.text()?)?;
        let result = envelope.favicon_generation_result;
        if result.result.status != STATUS_SUCCESS {
            return Err(GenerationError::Rejected(
                result
                    .result
                    .error_message
                    .clone()
                    .unwrap_or_else(|| result.result.status.clone()),
            ));
        }

        if let Some(favicon) = &result.favicon {
            for url in &favicon.files_urls {
                self.download(url, dest)?;
            }
        }
        Ok(result)
    }
}

/// Local file name for a generated file URL: its last path segment.
///
/// Returns `None` for URLs without a usable final segment, including `.`
/// and `..`.
pub fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.last()?;
    match segment {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}
