//! The shared fingerprint store
//!
//! A [`Dactyloscope`] owns the configuration, the path cache, the counters
//! and the background filler. Clones share all of them, so one instance is
//! built at startup and handed to the interceptor, templates and workers.

use crate::cache::{FingerprintCache, Manifest};
use crate::codec::{fingerprinted_path, with_prefix};
use crate::config::{DactyloscopeConfig, normalize_prefix};
use crate::engine::{fingerprint_file, fingerprint_file_blocking};
use crate::filler::BackgroundFiller;
use crate::stats::{CacheStats, StatsSnapshot};
use crate::{DactError, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub(crate) struct Shared {
	pub(crate) config: DactyloscopeConfig,
	pub(crate) cache: FingerprintCache,
	pub(crate) stats: CacheStats,
}

impl Shared {
	/// Joins `real_path` onto the root, refusing anything but plain segments
	pub(crate) fn full_path(&self, real_path: &str) -> Result<PathBuf> {
		let relative = Path::new(real_path.trim_start_matches('/'));
		let plain = relative
			.components()
			.all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

		if !plain || relative.as_os_str().is_empty() {
			tracing::warn!("Path traversal attempt blocked: {}", real_path);
			return Err(DactError::OutsideRoot(real_path.to_string()));
		}

		Ok(self.config.root_path.join(relative))
	}

	/// Hashes the file behind `real_path` and caches the pair
	///
	/// Returns the prefix-free canonical fingerprinted path.
	pub(crate) async fn compute(&self, real_path: &str) -> Result<String> {
		let full_path = self.full_path(real_path)?;
		self.stats.record_computation();

		let fingerprint = fingerprint_file(&full_path).await.inspect_err(|_| {
			self.stats.record_failure();
		})?;

		Ok(self.store(real_path, fingerprinted_path(real_path, &fingerprint)))
	}

	fn compute_blocking(&self, real_path: &str) -> Result<String> {
		let full_path = self.full_path(real_path)?;
		self.stats.record_computation();

		let fingerprint = fingerprint_file_blocking(&full_path).inspect_err(|_| {
			self.stats.record_failure();
		})?;

		Ok(self.store(real_path, fingerprinted_path(real_path, &fingerprint)))
	}

	fn store(&self, real_path: &str, fingerprinted: String) -> String {
		if self.cache.insert(real_path, fingerprinted.clone()) {
			tracing::info!("Created fingerprint for {}: {}", real_path, fingerprinted);
		}
		fingerprinted
	}

	/// Cached canonical path, computing it first when absent
	pub(crate) async fn ensure(&self, real_path: &str) -> Result<String> {
		match self.cache.lookup_by_real(real_path) {
			Some(fingerprinted) => Ok(fingerprinted),
			None => self.compute(real_path).await,
		}
	}
}

/// Shared fingerprint store
///
/// Building one requires a Tokio runtime, since misses in
/// [`dactify`](Self::dactify) are filled by a background task.
///
/// # Example
///
/// ```rust,no_run
/// use dactyloscope_fingerprint::{Dactyloscope, DactyloscopeConfig};
///
/// # async fn run() -> dactyloscope_fingerprint::Result<()> {
/// let dactyloscope = Dactyloscope::new(DactyloscopeConfig::new("public"))?;
///
/// let canonical = dactyloscope.fingerprint("/css/site.css").await?;
/// assert_eq!(dactyloscope.dactify("/css/site.css"), canonical);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Dactyloscope {
	pub(crate) shared: Arc<Shared>,
	filler: Arc<BackgroundFiller>,
}

impl Dactyloscope {
	/// Validates `config` and starts the background filler
	///
	/// Trailing slashes on `config.prefix` are trimmed.
	///
	/// # Errors
	///
	/// [`DactError::Config`] for an invalid configuration and
	/// [`DactError::Runtime`] when called outside a Tokio runtime.
	pub fn new(mut config: DactyloscopeConfig) -> Result<Self> {
		config.validate()?;
		config.prefix = normalize_prefix(std::mem::take(&mut config.prefix));
		let handle = tokio::runtime::Handle::try_current()
			.map_err(|e| DactError::Runtime(e.to_string()))?;

		let shared = Arc::new(Shared {
			config,
			cache: FingerprintCache::new(),
			stats: CacheStats::default(),
		});
		let filler = BackgroundFiller::spawn(Arc::clone(&shared), &handle);

		Ok(Self {
			shared,
			filler: Arc::new(filler),
		})
	}

	/// Configuration this store was built with
	pub fn config(&self) -> &DactyloscopeConfig {
		&self.shared.config
	}

	/// The underlying path cache
	pub fn cache(&self) -> &FingerprintCache {
		&self.shared.cache
	}

	/// Current counter values
	pub fn stats(&self) -> StatsSnapshot {
		self.shared.stats.snapshot()
	}

	/// Number of paths queued for background fingerprinting
	pub fn pending(&self) -> usize {
		self.filler.pending_len()
	}

	/// Absolute file path for `real_path`, or `None` if it escapes the root
	pub fn full_path(&self, real_path: &str) -> Option<PathBuf> {
		self.shared.full_path(real_path).ok()
	}

	/// Real path cached for a prefix-free fingerprinted path
	pub fn resolve(&self, fingerprinted_path: &str) -> Option<String> {
		let real_path = self.shared.cache.lookup_by_fingerprinted(fingerprinted_path);
		match real_path {
			Some(_) => self.shared.stats.record_hit(),
			None => self.shared.stats.record_miss(),
		}
		real_path
	}

	/// Outward-facing path for `real_path`, never waiting on I/O
	///
	/// Returns `prefix + fingerprinted` on a hit. On a miss returns
	/// `prefix + real_path` unchanged and queues the path so later calls
	/// hit. Failures in the background are logged and leave the path
	/// uncached.
	pub fn dactify(&self, real_path: &str) -> String {
		let prefix = &self.shared.config.prefix;

		if let Some(fingerprinted) = self.shared.cache.lookup_by_real(real_path) {
			self.shared.stats.record_hit();
			return with_prefix(&fingerprinted, prefix);
		}

		self.shared.stats.record_miss();
		if self.filler.enqueue(real_path) {
			tracing::debug!("Queued {} for fingerprinting", real_path);
		}
		with_prefix(real_path, prefix)
	}

	/// Outward-facing path for `real_path`, hashing on this thread on a miss
	///
	/// Meant for startup code; request handling uses [`dactify`](Self::dactify).
	pub fn dactify_blocking(&self, real_path: &str) -> Result<String> {
		let prefix = &self.shared.config.prefix;

		if let Some(fingerprinted) = self.shared.cache.lookup_by_real(real_path) {
			self.shared.stats.record_hit();
			return Ok(with_prefix(&fingerprinted, prefix));
		}

		self.shared.stats.record_miss();
		let fingerprinted = self.shared.compute_blocking(real_path)?;
		Ok(with_prefix(&fingerprinted, prefix))
	}

	/// Prefix-free canonical path for `real_path`, computing it when uncached
	pub async fn fingerprint(&self, real_path: &str) -> Result<String> {
		self.shared.ensure(real_path).await
	}

	/// Hashes `real_path` even when a pair is cached
	///
	/// The cache keeps the first pair it saw; the returned value reflects
	/// the bytes on disk now.
	pub async fn recompute(&self, real_path: &str) -> Result<String> {
		self.shared.compute(real_path).await
	}

	/// Snapshot of every cached pair
	pub fn manifest(&self) -> Manifest {
		self.shared.cache.snapshot()
	}

	/// Writes [`manifest`](Self::manifest) to `path` as JSON
	pub async fn write_manifest(&self, path: &Path) -> Result<()> {
		let json = self.manifest().to_json_pretty()?;

		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent)
				.await
				.map_err(|e| DactError::io(parent, e))?;
		}
		tokio::fs::write(path, json)
			.await
			.map_err(|e| DactError::io(path, e))
	}

	/// Per-request handle for templates and handlers
	pub fn dactifier(&self) -> Dactifier {
		Dactifier(self.clone())
	}
}

impl fmt::Debug for Dactyloscope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dactyloscope")
			.field("config", &self.shared.config)
			.field("cached", &self.shared.cache.len())
			.finish()
	}
}

/// Cloneable handle exposing [`Dactyloscope::dactify`]
///
/// The interceptor attaches one to every request it sees.
#[derive(Debug, Clone)]
pub struct Dactifier(Dactyloscope);

impl Dactifier {
	/// See [`Dactyloscope::dactify`]
	pub fn dactify(&self, real_path: &str) -> String {
		self.0.dactify(real_path)
	}

	/// The store behind this handle
	pub fn dactyloscope(&self) -> &Dactyloscope {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::time::Duration;
	use tempfile::TempDir;

	fn store(temp_dir: &TempDir) -> Dactyloscope {
		Dactyloscope::new(DactyloscopeConfig::new(temp_dir.path())).unwrap()
	}

	async fn wait_until_cached(dactyloscope: &Dactyloscope, real_path: &str) {
		for _ in 0..200 {
			if dactyloscope.cache().lookup_by_real(real_path).is_some() {
				return;
			}
			tokio::time::sleep(Duration::from_millis(10)).await;
		}
		panic!("{real_path} was never cached");
	}

	#[rstest]
	fn test_new_requires_runtime() {
		let temp_dir = TempDir::new().unwrap();
		let result = Dactyloscope::new(DactyloscopeConfig::new(temp_dir.path()));

		assert!(matches!(result, Err(DactError::Runtime(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_new_rejects_missing_root() {
		let temp_dir = TempDir::new().unwrap();
		let result = Dactyloscope::new(DactyloscopeConfig::new(temp_dir.path().join("nope")));

		assert!(matches!(result, Err(DactError::Config(_))));
	}

	#[rstest]
	#[case("/../secret.txt")]
	#[case("/a/../../secret.txt")]
	#[case("/")]
	#[case("")]
	#[tokio::test]
	async fn test_full_path_refuses_escape(#[case] real_path: &str) {
		let temp_dir = TempDir::new().unwrap();
		let dactyloscope = store(&temp_dir);

		assert_eq!(dactyloscope.full_path(real_path), None);
		assert!(matches!(
			dactyloscope.fingerprint(real_path).await,
			Err(DactError::OutsideRoot(_))
		));
	}

	#[rstest]
	#[tokio::test]
	async fn test_full_path_joins_under_root() {
		let temp_dir = TempDir::new().unwrap();
		let dactyloscope = store(&temp_dir);

		assert_eq!(
			dactyloscope.full_path("/css/./site.css"),
			Some(temp_dir.path().join("css/./site.css"))
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_dactify_miss_then_hit() {
		let temp_dir = TempDir::new().unwrap();
		std::fs::write(temp_dir.path().join("app.js"), "console.log(1);").unwrap();
		let dactyloscope = store(&temp_dir);

		assert_eq!(dactyloscope.dactify("/app.js"), "/app.js");
		wait_until_cached(&dactyloscope, "/app.js").await;

		let first = dactyloscope.dactify("/app.js");
		let second = dactyloscope.dactify("/app.js");
		assert!(first.starts_with("/app-dact-"));
		assert_eq!(first, second);
		assert_eq!(dactyloscope.stats().computations, 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_dactify_missing_file_stays_uncached() {
		let temp_dir = TempDir::new().unwrap();
		let dactyloscope = store(&temp_dir);

		assert_eq!(dactyloscope.dactify("/missing.css"), "/missing.css");
		for _ in 0..200 {
			if dactyloscope.stats().failures == 1 && dactyloscope.pending() == 0 {
				break;
			}
			tokio::time::sleep(Duration::from_millis(10)).await;
		}

		assert_eq!(dactyloscope.stats().failures, 1);
		assert!(dactyloscope.cache().is_empty());
		assert_eq!(dactyloscope.dactify("/missing.css"), "/missing.css");
	}

	#[rstest]
	#[tokio::test]
	async fn test_dactify_blocking_uses_prefix() {
		let temp_dir = TempDir::new().unwrap();
		std::fs::write(temp_dir.path().join("README"), "read me").unwrap();
		let config = DactyloscopeConfig::new(temp_dir.path()).with_prefix("https://cdn.example.com/");
		let dactyloscope = Dactyloscope::new(config).unwrap();

		let url = dactyloscope.dactify_blocking("/README").unwrap();

		assert_eq!(
			url,
			format!(
				"https://cdn.example.com/README-dact-{}",
				crate::fingerprint_bytes(b"read me")
			)
		);
		assert_eq!(dactyloscope.dactify("/README"), url);
		assert_eq!(dactyloscope.stats().computations, 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_prefix_set_directly_is_normalized() {
		let temp_dir = TempDir::new().unwrap();
		std::fs::write(temp_dir.path().join("a.js"), "a").unwrap();
		let mut config = DactyloscopeConfig::new(temp_dir.path());
		config.prefix = "/static/".to_string();
		let dactyloscope = Dactyloscope::new(config).unwrap();

		assert_eq!(dactyloscope.config().prefix, "/static");
		assert_eq!(dactyloscope.dactify("/a.js"), "/static/a.js");
		assert_eq!(
			dactyloscope.dactify_blocking("/a.js").unwrap(),
			format!("/static/a-dact-{}.js", crate::fingerprint_bytes(b"a"))
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_fingerprint_and_resolve() {
		let temp_dir = TempDir::new().unwrap();
		std::fs::create_dir(temp_dir.path().join("images")).unwrap();
		std::fs::write(temp_dir.path().join("images/logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
		let dactyloscope = store(&temp_dir);

		let canonical = dactyloscope.fingerprint("/images/logo.png").await.unwrap();

		assert_eq!(dactyloscope.resolve(&canonical).as_deref(), Some("/images/logo.png"));
		assert_eq!(dactyloscope.resolve("/images/logo.png"), None);
		let stats = dactyloscope.stats();
		assert_eq!((stats.hits, stats.misses), (1, 1));
	}

	#[rstest]
	#[tokio::test]
	async fn test_write_manifest() {
		let temp_dir = TempDir::new().unwrap();
		std::fs::write(temp_dir.path().join("a.css"), "a").unwrap();
		let dactyloscope = store(&temp_dir);
		let canonical = dactyloscope.fingerprint("/a.css").await.unwrap();

		let out = temp_dir.path().join("out/manifest.json");
		dactyloscope.write_manifest(&out).await.unwrap();

		let manifest: Manifest =
			serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
		assert_eq!(manifest.paths.get("/a.css"), Some(&canonical));
	}

	#[rstest]
	#[tokio::test]
	async fn test_recompute_reflects_disk_but_cache_keeps_first_pair() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("a.css");
		std::fs::write(&path, "one").unwrap();
		let dactyloscope = store(&temp_dir);
		let first = dactyloscope.fingerprint("/a.css").await.unwrap();

		std::fs::write(&path, "two").unwrap();
		let second = dactyloscope.recompute("/a.css").await.unwrap();

		assert_ne!(first, second);
		assert_eq!(dactyloscope.fingerprint("/a.css").await.unwrap(), first);
		assert_eq!(dactyloscope.stats().computations, 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_dactifier_shares_store() {
		let temp_dir = TempDir::new().unwrap();
		std::fs::write(temp_dir.path().join("a.js"), "a").unwrap();
		let dactyloscope = store(&temp_dir);
		let canonical = dactyloscope.fingerprint("/a.js").await.unwrap();

		assert_eq!(dactyloscope.dactifier().dactify("/a.js"), canonical);
	}
}
