//! Outgoing response representation

use bytes::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, StatusCode};

/// HTTP Response representation
#[derive(Debug, Clone)]
pub struct Response {
	/// Status code
	pub status: StatusCode,
	/// Response headers
	pub headers: HeaderMap,
	/// Response body
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use dactyloscope_http::Response;
	/// use hyper::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 404 Not Found status
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// Set the response body
	///
	/// # Examples
	///
	/// ```
	/// use dactyloscope_http::Response;
	/// use bytes::Bytes;
	///
	/// let response = Response::ok().with_body("body { color: red; }");
	/// assert_eq!(response.body, Bytes::from("body { color: red; }"));
	/// ```
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header, silently skipping malformed names or values
	///
	/// # Examples
	///
	/// ```
	/// use dactyloscope_http::Response;
	///
	/// let response = Response::ok().with_header("Cache-Control", "public, max-age=60");
	/// assert_eq!(
	///     response.headers.get("cache-control").unwrap().to_str().unwrap(),
	///     "public, max-age=60"
	/// );
	/// ```
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		self.set_header(name, value);
		self
	}

	/// Insert a header in place, replacing any previous value
	///
	/// Returns `false` when the name or value is malformed.
	pub fn set_header(&mut self, name: &str, value: &str) -> bool {
		match (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.insert(name, value);
				true
			}
			_ => false,
		}
	}

	/// Returns a header value as a string, if present and valid UTF-8
	pub fn header_str(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}
