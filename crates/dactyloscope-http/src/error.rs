//! HTTP layer error types.

use thiserror::Error;

/// Result type for request handling.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building requests or running handlers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// A URI or path could not be parsed.
	#[error("invalid URI: {0}")]
	InvalidUri(String),

	/// A header name or value was rejected.
	#[error("invalid header: {0}")]
	InvalidHeader(String),

	/// A downstream handler failed.
	#[error("handler error: {0}")]
	Handler(String),
}

impl From<http::uri::InvalidUri> for Error {
	fn from(error: http::uri::InvalidUri) -> Self {
		Error::InvalidUri(error.to_string())
	}
}

impl From<http::uri::InvalidUriParts> for Error {
	fn from(error: http::uri::InvalidUriParts) -> Self {
		Error::InvalidUri(error.to_string())
	}
}
