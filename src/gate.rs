//! The cache gate: regenerate favicons only when the request changed.
//!
//! ```text
//! digest = request_digest(request)
//! stored = store.get(DIGEST_KEY)
//! classify(stored, digest, cache_dir/response.json exists)
//!   Fresh           → skip, reuse cache dir
//!   Unknown | Stale → generate into staging dir (request + versioning=digest)
//!                       ok  → replace cache dir, write response.json, store digest
//!                       err → log, keep old cache dir and old digest
//! ```
//!
//! The digest is stored only after the new package is fully in place, so a
//! crash or failure mid-generation can never make a broken result look fresh.
//! Generation failures are not errors of [`run`]: they come back as
//! [`Outcome::Failed`] and the build carries on with whatever output exists.

use crate::cache::{CacheError, CacheStore, DIGEST_KEY, Freshness, classify};
use crate::digest::request_digest;
use crate::paths::BuildPaths;
use crate::request::CompiledRequest;
use crate::service::{FaviconGenerator, GenerationError, GenerationResult};
use std::fs;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum GateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the gate did about the generation call.
#[derive(Debug)]
pub enum Outcome {
    /// Fresh: the service was not called.
    Skipped,
    /// The service was called and the new package is in the cache dir.
    Generated(GenerationResult),
    /// The service was called and failed; nothing was changed.
    Failed(GenerationError),
}

#[derive(Debug)]
pub struct GateReport {
    pub digest: String,
    pub freshness: Freshness,
    pub outcome: Outcome,
}

/// Run the gate for one compiled request.
///
/// `force` regenerates even when the request is fresh. Errors are limited to
/// local IO and the cache store; the service call itself never fails the run.
pub fn run<G, S>(
    request: &CompiledRequest,
    generator: &G,
    store: &mut S,
    paths: &BuildPaths,
    force: bool,
) -> Result<GateReport, GateError>
where
    G: FaviconGenerator + ?Sized,
    S: CacheStore + ?Sized,
{
    let digest = request_digest(request);
    let stored = store.get(DIGEST_KEY)?;
    let freshness = classify(
        stored.as_deref(),
        &digest,
        paths.cached_response().exists(),
    );
    debug!(%digest, stored = ?stored, %freshness, "classified favicon request");

    if !freshness.needs_regeneration() && !force {
        info!("Favicons already exist and config has not changed. Skipping favicon generation.");
        return Ok(GateReport {
            digest,
            freshness,
            outcome: Outcome::Skipped,
        });
    }

    info!("Start favicon generation. This may take a while!");
    let staging = paths.staging_dir();
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;

    let versioned = request.clone().with_versioning(&digest);
    let outcome = match generator.generate(&versioned, &staging) {
        Ok(result) => {
            fs::write(
                staging.join(crate::paths::RESPONSE_FILENAME),
                serde_json::to_string(&result)?,
            )?;
            if paths.cache_dir.exists() {
                fs::remove_dir_all(&paths.cache_dir)?;
            }
            if let Some(parent) = paths.cache_dir.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(&staging, &paths.cache_dir)?;
            store.set(DIGEST_KEY, &digest)?;
            info!(%digest, "favicon generation complete");
            Outcome::Generated(result)
        }
        Err(err) => {
            match err.status_text() {
                Some(status) => error!("{err} ({status})"),
                None => error!("{err}"),
            }
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                debug!(error = %cleanup, "could not remove staging dir");
            }
            Outcome::Failed(err)
        }
    };

    Ok(GateReport {
        digest,
        freshness,
        outcome,
    })
}
