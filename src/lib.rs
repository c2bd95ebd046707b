//! # RFG Favicons
//!
//! Build-time favicon generation through the RealFaviconGenerator API, gated
//! by a content digest so the service is called only when something changed.
//!
//! # Architecture: Compile, Gate, Publish
//!
//! ```text
//! 1. Compile   favicon.toml  →  CompiledRequest   (options → service request JSON)
//! 2. Gate      request       →  cache dir         (call the service only if stale)
//! 3. Publish   cache dir     →  public/favicons/  (copy, optional manifest rewrite)
//! ```
//!
//! Compilation is a pure function of the options and the picture files it
//! reads, which makes its output a stable thing to hash. The gate owns all
//! the side effects of talking to the service; publishing runs on every
//! build and never talks to the network.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `favicon.toml` loading, stock defaults, merging, validation |
//! | [`design`] | Per-platform design compilation (iOS, Windows, Android, Safari, Open Graph) |
//! | [`filter`] | Drops unset fields from serialized designs |
//! | [`request`] | Assembles the full generation request, applies the user override |
//! | [`digest`] | Canonical JSON and the SHA-256 request digest |
//! | [`cache`] | Key-value store for the last digest, freshness classification |
//! | [`service`] | The generation service seam and the RealFaviconGenerator client |
//! | [`gate`] | Decides whether to regenerate, stages and installs new packages |
//! | [`publish`] | Copies the cached package to the public dir, head markup |
//! | [`paths`] | Cache, staging and public directory layout |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## The Digest Covers the Whole Request
//!
//! The digest is computed over the compiled request with the master picture
//! already inlined as base64, so replacing `icon.png` with a new image
//! regenerates even when `favicon.toml` is untouched. Keys are sorted before
//! hashing; two option files that differ only in key order produce the same
//! digest. The `versioning` block sent to the service carries the digest
//! itself and is added after hashing.
//!
//! ## A Failed Call Never Looks Fresh
//!
//! New packages are downloaded into a staging directory next to the cache
//! dir and swapped in only when complete. The digest is stored after the
//! swap. A network error, an error status, or a rejected request leaves the
//! previous package and the previous digest exactly as they were, so the
//! next build tries again and the site keeps its old favicons meanwhile.
//!
//! ## Missing Output Forces Regeneration
//!
//! A matching digest is not enough to skip: the cached `response.json` must
//! also exist. Deleting the cache dir is therefore a supported way to force
//! a fresh package, alongside `build --force`.
//!
//! ## Optional Fields Are Omitted, Not Nulled
//!
//! The service treats a present key differently from an absent one. Design
//! structs serialize unset options as `null` and [`filter::strip_unset`]
//! removes them before they reach the request, leaving `false`, `0`, and
//! empty strings in place.

pub mod cache;
pub mod config;
pub mod design;
pub mod digest;
pub mod filter;
pub mod gate;
pub mod output;
pub mod paths;
pub mod publish;
pub mod request;
pub mod service;

#[cfg(test)]
pub(crate) mod test_helpers;
