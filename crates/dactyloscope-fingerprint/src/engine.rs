//! Content digests for asset files
//!
//! The blocking and async readers feed the same chunked MD5 state, so both
//! produce identical fingerprints for identical bytes. A read error at any
//! point aborts the digest; a truncated prefix is never returned.

use crate::{DactError, Result};
use md5::{Digest, Md5};
use std::fmt;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 64 * 1024;

/// Number of hex characters in a rendered fingerprint
pub const FINGERPRINT_HEX_LEN: usize = 32;

/// 128-bit content digest, rendered as 32 lowercase hex characters
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
	/// Wraps raw digest bytes
	pub fn from_bytes(bytes: [u8; 16]) -> Self {
		Self(bytes)
	}

	/// Raw digest bytes
	pub fn as_bytes(&self) -> &[u8; 16] {
		&self.0
	}

	/// Lowercase hex rendering
	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}

	fn from_hasher(hasher: Md5) -> Self {
		let digest = hasher.finalize();
		let mut bytes = [0u8; 16];
		bytes.copy_from_slice(&digest);
		Self(bytes)
	}
}

impl fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl fmt::Debug for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Fingerprint({})", self.to_hex())
	}
}

/// Rejected fingerprint text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected 32 lowercase hex characters, got {0:?}")]
pub struct ParseFingerprintError(String);

impl FromStr for Fingerprint {
	type Err = ParseFingerprintError;

	/// Only the wire form is accepted: exactly 32 lowercase hex characters.
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let valid = s.len() == FINGERPRINT_HEX_LEN
			&& s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
		if !valid {
			return Err(ParseFingerprintError(s.to_string()));
		}

		let mut bytes = [0u8; 16];
		hex::decode_to_slice(s, &mut bytes).map_err(|_| ParseFingerprintError(s.to_string()))?;
		Ok(Self(bytes))
	}
}

/// Digest of in-memory content
///
/// # Example
///
/// ```rust
/// use dactyloscope_fingerprint::fingerprint_bytes;
///
/// assert_eq!(
///     fingerprint_bytes(b"").to_string(),
///     "d41d8cd98f00b204e9800998ecf8427e"
/// );
/// ```
pub fn fingerprint_bytes(content: &[u8]) -> Fingerprint {
	let mut hasher = Md5::new();
	hasher.update(content);
	Fingerprint::from_hasher(hasher)
}

/// Digest of a file's full content, reading on the current thread
///
/// Only for startup paths; request handling uses [`fingerprint_file`].
///
/// # Errors
///
/// Returns [`DactError::Io`] when the file cannot be opened or read.
pub fn fingerprint_file_blocking(path: &Path) -> Result<Fingerprint> {
	let mut file = std::fs::File::open(path).map_err(|e| DactError::io(path, e))?;
	let mut hasher = Md5::new();
	let mut buffer = vec![0u8; CHUNK_SIZE];

	loop {
		match file.read(&mut buffer) {
			Ok(0) => break,
			Ok(n) => hasher.update(&buffer[..n]),
			Err(e) if e.kind() == ErrorKind::Interrupted => continue,
			Err(e) => return Err(DactError::io(path, e)),
		}
	}

	Ok(Fingerprint::from_hasher(hasher))
}

/// Digest of a file's full content using non-blocking reads
///
/// # Errors
///
/// Returns [`DactError::Io`] when the file cannot be opened or read.
pub async fn fingerprint_file(path: &Path) -> Result<Fingerprint> {
	let mut file = tokio::fs::File::open(path)
		.await
		.map_err(|e| DactError::io(path, e))?;
	let mut hasher = Md5::new();
	let mut buffer = vec![0u8; CHUNK_SIZE];

	loop {
		let n = file
			.read(&mut buffer)
			.await
			.map_err(|e| DactError::io(path, e))?;
		if n == 0 {
			break;
		}
		hasher.update(&buffer[..n]);
	}

	Ok(Fingerprint::from_hasher(hasher))
}
