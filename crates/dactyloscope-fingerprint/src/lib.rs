//! # Dactyloscope Fingerprint
//!
//! Content-based fingerprints for static assets and the bidirectional cache
//! that maps real asset paths to their cache-busting, fingerprinted form.
//!
//! A fingerprinted path embeds the MD5 digest of the file's bytes in the
//! final path segment:
//!
//! ```text
//! /images/logo.png  ->  /images/logo-dact-0123456789abcdef0123456789abcdef.png
//! ```
//!
//! Because a given path's content is assumed immutable for the lifetime of
//! the process, cache entries are never invalidated, and responses served
//! through a fingerprinted URL can be cached by clients indefinitely.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dactyloscope_fingerprint::{Dactyloscope, DactyloscopeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DactyloscopeConfig::new("public").with_prefix("https://cdn.example.com");
//!     let dactyloscope = Dactyloscope::new(config)?;
//!
//!     // Warm the cache before serving traffic
//!     let report = dactyloscope.pregenerate_all().await?;
//!     println!("fingerprinted {} files", report.fingerprinted);
//!
//!     // Never blocks: falls back to the plain path on a miss
//!     let url = dactyloscope.dactify("/css/site.css");
//!     println!("{url}");
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`config`] - Root path, max-age and prefix settings
//! - [`engine`] - File digest computation
//! - [`codec`] - Encoding and decoding of fingerprinted paths
//! - [`cache`] - Bidirectional path cache and manifest snapshots
//! - [`stats`] - Lookup and computation counters
//! - [`service`] - The shared [`Dactyloscope`] store and its dactify handle
//! - [`walker`] - Bulk precomputation over the asset tree
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
mod filler;
pub mod service;
pub mod stats;
pub mod walker;

pub use cache::{FingerprintCache, Manifest};
pub use codec::{decode, encode, fingerprinted_path, is_fingerprinted};
pub use config::DactyloscopeConfig;
pub use engine::{
	Fingerprint, ParseFingerprintError, fingerprint_bytes, fingerprint_file, fingerprint_file_blocking,
};
pub use error::{DactError, Result};
pub use service::{Dactifier, Dactyloscope};
pub use stats::{CacheStats, StatsSnapshot};
pub use walker::PregenerateReport;
