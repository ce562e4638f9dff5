//! Fingerprinting error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fingerprinting operations.
pub type Result<T> = std::result::Result<T, DactError>;

/// Fingerprinting errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DactError {
	/// A file could not be opened or read to the end.
	#[error("failed to read {}: {source}", path.display())]
	Io {
		/// File being read.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// A real path resolves outside the configured root.
	#[error("path escapes the asset root: {0}")]
	OutsideRoot(String),

	/// Invalid configuration value.
	#[error("invalid configuration: {0}")]
	Config(String),

	/// The asset root could not be walked.
	#[error("failed to walk asset root: {0}")]
	Walk(#[from] walkdir::Error),

	/// No async runtime to run background work on.
	#[error("async runtime unavailable: {0}")]
	Runtime(String),

	/// Manifest serialization failure.
	#[error("manifest error: {0}")]
	Manifest(String),
}

impl DactError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		DactError::Io {
			path: path.into(),
			source,
		}
	}
}
