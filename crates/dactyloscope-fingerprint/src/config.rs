//! Configuration for fingerprinting and URL rewriting

use crate::{DactError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default client cache lifetime in milliseconds (one year)
pub const DEFAULT_MAX_AGE_MS: u64 = 31_556_926_000;

/// Default number of files hashed concurrently by background work
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Process-wide settings, fixed once the [`crate::Dactyloscope`] is built
///
/// # Example
///
/// ```rust
/// use dactyloscope_fingerprint::DactyloscopeConfig;
///
/// let config = DactyloscopeConfig::new("public")
///     .with_max_age(60_000)
///     .with_prefix("/assets/");
///
/// assert_eq!(config.max_age_secs(), 60);
/// assert_eq!(config.prefix, "/assets");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DactyloscopeConfig {
	/// Directory every real path is relative to
	pub root_path: PathBuf,

	/// Client cache lifetime in milliseconds
	#[serde(default = "default_max_age")]
	pub max_age: u64,

	/// Prepended to every outward-facing fingerprinted path
	///
	/// Trailing slashes are trimmed when the store is built.
	#[serde(default)]
	pub prefix: String,

	/// Width of the hashing worker pools
	#[serde(default = "default_concurrency")]
	pub concurrency: usize,

	/// Emit `no-cache="set-cookie"` alongside long-lived cache directives
	#[serde(default)]
	pub no_cache_set_cookie: bool,
}

fn default_max_age() -> u64 {
	DEFAULT_MAX_AGE_MS
}

fn default_concurrency() -> usize {
	DEFAULT_CONCURRENCY
}

impl DactyloscopeConfig {
	/// Creates a configuration with defaults for everything but the root
	pub fn new(root_path: impl Into<PathBuf>) -> Self {
		Self {
			root_path: root_path.into(),
			max_age: DEFAULT_MAX_AGE_MS,
			prefix: String::new(),
			concurrency: DEFAULT_CONCURRENCY,
			no_cache_set_cookie: false,
		}
	}

	/// Sets the client cache lifetime in milliseconds
	pub fn with_max_age(mut self, max_age_ms: u64) -> Self {
		self.max_age = max_age_ms;
		self
	}

	/// Sets the outward-facing prefix; trailing slashes are dropped
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = normalize_prefix(prefix.into());
		self
	}

	/// Sets the hashing worker pool width
	pub fn with_concurrency(mut self, concurrency: usize) -> Self {
		self.concurrency = concurrency;
		self
	}

	/// Enables the stricter cache directive variant
	pub fn with_no_cache_set_cookie(mut self, enabled: bool) -> Self {
		self.no_cache_set_cookie = enabled;
		self
	}

	/// Client cache lifetime in whole seconds
	pub fn max_age_secs(&self) -> u64 {
		self.max_age / 1000
	}

	/// Parses a TOML document
	///
	/// # Example
	///
	/// ```rust
	/// use dactyloscope_fingerprint::DactyloscopeConfig;
	///
	/// let config = DactyloscopeConfig::from_toml_str(r#"
	///     root_path = "public"
	///     prefix = "/static"
	/// "#).unwrap();
	///
	/// assert_eq!(config.max_age, 31_556_926_000);
	/// assert_eq!(config.concurrency, 4);
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self> {
		let mut config: Self =
			toml::from_str(content).map_err(|e| DactError::Config(e.to_string()))?;
		config.prefix = normalize_prefix(std::mem::take(&mut config.prefix));
		Ok(config)
	}

	/// Reads and parses a TOML file
	pub fn from_file(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).map_err(|e| DactError::io(path, e))?;
		Self::from_toml_str(&content)
	}

	/// Checks that the root is a directory and the pool width is usable
	pub fn validate(&self) -> Result<()> {
		if !self.root_path.is_dir() {
			return Err(DactError::Config(format!(
				"root_path is not a directory: {}",
				self.root_path.display()
			)));
		}

		if self.concurrency == 0 {
			return Err(DactError::Config(
				"concurrency must be at least 1".to_string(),
			));
		}

		Ok(())
	}
}

pub(crate) fn normalize_prefix(prefix: String) -> String {
	prefix.trim_end_matches('/').to_string()
}
