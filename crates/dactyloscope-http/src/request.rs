//! Incoming request representation

use crate::{Error, Extensions, Result};
use bytes::Bytes;
use http::uri::PathAndQuery;
use hyper::{HeaderMap, Method, Uri, Version};

/// HTTP request as seen by middleware
///
/// `uri` is the effective target and may be rewritten by middleware;
/// `original_uri` always holds what the client asked for.
#[derive(Debug, Clone)]
pub struct Request {
	/// Request method
	pub method: Method,
	/// Effective request target
	pub uri: Uri,
	/// HTTP version
	pub version: Version,
	/// Request headers
	pub headers: HeaderMap,
	/// Request body
	pub body: Bytes,
	/// Per-request values shared with downstream handlers
	pub extensions: Extensions,
	original_uri: Uri,
}

impl Request {
	/// Creates a request from its parts
	///
	/// # Examples
	///
	/// ```
	/// use dactyloscope_http::Request;
	/// use hyper::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::GET,
	///     Uri::from_static("/css/site.css"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::new(),
	/// );
	/// assert_eq!(request.path(), "/css/site.css");
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			original_uri: uri.clone(),
			uri,
			version,
			headers,
			body,
			extensions: Extensions::new(),
		}
	}

	/// Starts building a request
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Path of the effective request target
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Query string of the effective request target
	pub fn query(&self) -> Option<&str> {
		self.uri.query()
	}

	/// Target as originally received, before any rewrite
	pub fn original_uri(&self) -> &Uri {
		&self.original_uri
	}

	/// Replaces the path of the effective target, keeping the query string
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidUri`] when `path` is not a valid URI path.
	///
	/// # Examples
	///
	/// ```
	/// use dactyloscope_http::Request;
	/// use hyper::Method;
	///
	/// let mut request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/app-dact-0123456789abcdef0123456789abcdef.js?v=2")
	///     .build()
	///     .unwrap();
	/// request.set_path("/app.js").unwrap();
	///
	/// assert_eq!(request.uri.to_string(), "/app.js?v=2");
	/// assert_eq!(
	///     request.original_uri().path(),
	///     "/app-dact-0123456789abcdef0123456789abcdef.js"
	/// );
	/// ```
	pub fn set_path(&mut self, path: &str) -> Result<()> {
		let path_and_query = match self.uri.query() {
			Some(query) => format!("{}?{}", path, query),
			None => path.to_string(),
		};

		let mut parts = self.uri.clone().into_parts();
		parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
		self.uri = Uri::from_parts(parts)?;
		Ok(())
	}
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
}

impl RequestBuilder {
	/// Sets the method (defaults to GET)
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Sets the request target (defaults to `/`)
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	/// Sets the HTTP version
	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Sets all headers at once
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Adds a single header
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidHeader`] when the name or value is malformed.
	pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
		let name = hyper::header::HeaderName::from_bytes(name.as_bytes())
			.map_err(|e| Error::InvalidHeader(e.to_string()))?;
		let value = hyper::header::HeaderValue::from_str(value)
			.map_err(|e| Error::InvalidHeader(e.to_string()))?;
		self.headers.insert(name, value);
		Ok(self)
	}

	/// Sets the body
	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Builds the request
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidUri`] when the target cannot be parsed.
	pub fn build(self) -> Result<Request> {
		let uri: Uri = match self.uri {
			Some(uri) => uri.parse()?,
			None => Uri::from_static("/"),
		};

		Ok(Request::new(
			self.method,
			uri,
			self.version,
			self.headers,
			self.body,
		))
	}
}
