//! Bidirectional real/fingerprinted path cache
//!
//! Both directions live behind a single lock so a reader never sees one
//! half of a pair. Entries are never evicted: a path's content is assumed
//! immutable for the lifetime of the process.

use crate::{DactError, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Default)]
struct CacheMaps {
	real_to_fingerprinted: HashMap<String, String>,
	fingerprinted_to_real: HashMap<String, String>,
}

/// Append-only mapping between real and fingerprinted paths
///
/// Keys and values are prefix-free; callers add the configured prefix when
/// handing paths to clients.
///
/// # Example
///
/// ```rust
/// use dactyloscope_fingerprint::FingerprintCache;
///
/// let cache = FingerprintCache::new();
/// cache.insert("/app.js", "/app-dact-0123456789abcdef0123456789abcdef.js");
///
/// assert_eq!(
///     cache.lookup_by_fingerprinted("/app-dact-0123456789abcdef0123456789abcdef.js").as_deref(),
///     Some("/app.js")
/// );
/// ```
#[derive(Debug, Default)]
pub struct FingerprintCache {
	maps: RwLock<CacheMaps>,
}

impl FingerprintCache {
	/// Creates an empty cache
	pub fn new() -> Self {
		Self::default()
	}

	/// Fingerprinted path for `real_path`, if computed
	pub fn lookup_by_real(&self, real_path: &str) -> Option<String> {
		self.maps.read().real_to_fingerprinted.get(real_path).cloned()
	}

	/// Real path for `fingerprinted_path`, if computed
	pub fn lookup_by_fingerprinted(&self, fingerprinted_path: &str) -> Option<String> {
		self.maps
			.read()
			.fingerprinted_to_real
			.get(fingerprinted_path)
			.cloned()
	}

	/// Stores both directions of a pair
	///
	/// Returns `false` when `real_path` was already mapped; the existing pair
	/// is left in place.
	pub fn insert(&self, real_path: impl Into<String>, fingerprinted_path: impl Into<String>) -> bool {
		let real_path = real_path.into();
		let fingerprinted_path = fingerprinted_path.into();

		let mut maps = self.maps.write();
		if maps.real_to_fingerprinted.contains_key(&real_path) {
			return false;
		}
		maps.fingerprinted_to_real
			.insert(fingerprinted_path.clone(), real_path.clone());
		maps.real_to_fingerprinted
			.insert(real_path, fingerprinted_path);
		true
	}

	/// Number of cached pairs
	pub fn len(&self) -> usize {
		self.maps.read().real_to_fingerprinted.len()
	}

	/// Whether nothing has been cached yet
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Point-in-time copy of every pair, ordered by real path
	pub fn snapshot(&self) -> Manifest {
		let maps = self.maps.read();
		Manifest {
			version: MANIFEST_VERSION,
			paths: maps
				.real_to_fingerprinted
				.iter()
				.map(|(real, fingerprinted)| (real.clone(), fingerprinted.clone()))
				.collect(),
		}
	}
}

/// Serializable view of the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
	/// Manifest format version
	pub version: u32,
	/// Real path to fingerprinted path
	pub paths: BTreeMap<String, String>,
}

impl Manifest {
	/// Renders as indented JSON
	pub fn to_json_pretty(&self) -> Result<String> {
		serde_json::to_string_pretty(self).map_err(|e| DactError::Manifest(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::Arc;

	#[rstest]
	fn test_insert_populates_both_directions() {
		let cache = FingerprintCache::new();
		assert!(cache.is_empty());

		assert!(cache.insert("/a.css", "/a-dact-x.css"));

		assert_eq!(cache.lookup_by_real("/a.css").as_deref(), Some("/a-dact-x.css"));
		assert_eq!(
			cache.lookup_by_fingerprinted("/a-dact-x.css").as_deref(),
			Some("/a.css")
		);
		assert_eq!(cache.len(), 1);
	}

	#[rstest]
	fn test_insert_keeps_first_pair() {
		let cache = FingerprintCache::new();
		assert!(cache.insert("/a.css", "/a-dact-x.css"));
		assert!(!cache.insert("/a.css", "/a-dact-y.css"));

		assert_eq!(cache.lookup_by_real("/a.css").as_deref(), Some("/a-dact-x.css"));
		assert_eq!(cache.lookup_by_fingerprinted("/a-dact-y.css"), None);
		assert_eq!(cache.len(), 1);
	}

	#[rstest]
	fn test_concurrent_readers_see_whole_pairs() {
		let cache = Arc::new(FingerprintCache::new());
		let writer = {
			let cache = Arc::clone(&cache);
			std::thread::spawn(move || {
				for i in 0..500 {
					cache.insert(format!("/f{i}.js"), format!("/f{i}-dact.js"));
				}
			})
		};

		for _ in 0..500 {
			let snapshot = cache.snapshot();
			for (real, fingerprinted) in &snapshot.paths {
				assert_eq!(
					cache.lookup_by_fingerprinted(fingerprinted).as_ref(),
					Some(real)
				);
			}
		}
		writer.join().unwrap();
		assert_eq!(cache.len(), 500);
	}

	#[rstest]
	fn test_snapshot_to_json() {
		let cache = FingerprintCache::new();
		cache.insert("/b.js", "/b-dact-2.js");
		cache.insert("/a.js", "/a-dact-1.js");

		let manifest = cache.snapshot();
		let json = manifest.to_json_pretty().unwrap();
		let parsed: Manifest = serde_json::from_str(&json).unwrap();

		assert_eq!(parsed, manifest);
		assert_eq!(parsed.version, 1);
		assert_eq!(
			parsed.paths.keys().collect::<Vec<_>>(),
			vec!["/a.js", "/b.js"]
		);
	}
}
