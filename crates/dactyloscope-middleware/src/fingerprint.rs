//! Fingerprinted URL interception
//!
//! A request whose path carries a `-dact-<hex>` marker is rewritten to the
//! real asset path and its response marked cacheable for the configured
//! max-age, but only when the marker matches the file's current content.
//! Everything else is forwarded untouched.

use async_trait::async_trait;
use dactyloscope_fingerprint::codec::{decode, strip_prefix};
use dactyloscope_fingerprint::{Dactifier, Dactyloscope};
use dactyloscope_http::{Handler, Middleware, Request, Response, Result};
use hyper::header::CACHE_CONTROL;
use std::sync::Arc;

/// Outcome of inspecting one request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
	/// No fingerprint marker
	Passthrough,
	/// Known fingerprinted path; rewrite to the real path
	RewriteTrusted(String),
	/// Marker present but the decoded file does not exist under the root
	PassthroughUnknown,
	/// Freshly verified: the marker matches the file's content
	RewriteFresh(String),
	/// The file exists but the marker belongs to other content
	StaleReject {
		/// Prefix-free path that was requested
		requested: String,
		/// Prefix-free path for the current content
		canonical: String,
	},
	/// The file could not be fingerprinted
	PassthroughError,
}

impl Decision {
	/// Real path to serve instead, when the request is rewritten
	pub fn rewrite_target(&self) -> Option<&str> {
		match self {
			Decision::RewriteTrusted(real) | Decision::RewriteFresh(real) => Some(real),
			_ => None,
		}
	}
}

/// Middleware serving fingerprinted asset URLs
///
/// Also stores a [`Dactifier`] in every request's extensions unless an
/// earlier layer already did, so handlers can fingerprint their own links.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use dactyloscope_fingerprint::{Dactyloscope, DactyloscopeConfig};
/// use dactyloscope_http::{Handler, MiddlewareChain, Request, Response, Result};
/// use dactyloscope_middleware::FingerprintMiddleware;
///
/// struct StaticFiles;
///
/// #[async_trait::async_trait]
/// impl Handler for StaticFiles {
///     async fn handle(&self, request: Request) -> Result<Response> {
///         Ok(Response::ok().with_body(request.path().to_string()))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let dactyloscope = Dactyloscope::new(DactyloscopeConfig::new("public")).unwrap();
/// let chain = MiddlewareChain::new(Arc::new(StaticFiles))
///     .with_middleware(Arc::new(FingerprintMiddleware::new(dactyloscope)));
///
/// let request = Request::builder().uri("/css/site.css").build().unwrap();
/// let response = chain.handle(request).await.unwrap();
/// assert_eq!(response.body, "/css/site.css");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct FingerprintMiddleware {
	dactyloscope: Dactyloscope,
	cache_control: String,
}

impl FingerprintMiddleware {
	/// Creates the middleware over a shared store
	pub fn new(dactyloscope: Dactyloscope) -> Self {
		let config = dactyloscope.config();
		let mut cache_control = format!("public, max-age={}", config.max_age_secs());
		if config.no_cache_set_cookie {
			cache_control.push_str(", no-cache=\"set-cookie\"");
		}

		Self {
			dactyloscope,
			cache_control,
		}
	}

	/// `Cache-Control` value set on rewritten responses
	pub fn cache_control_value(&self) -> &str {
		&self.cache_control
	}

	/// The store this middleware reads and fills
	pub fn dactyloscope(&self) -> &Dactyloscope {
		&self.dactyloscope
	}

	/// Classifies a request path, filling the cache on first sight of a
	/// valid fingerprinted path
	pub async fn decide(&self, path: &str) -> Decision {
		let path = strip_prefix(path, &self.dactyloscope.config().prefix);

		let Some(real_path) = decode(path) else {
			return Decision::Passthrough;
		};

		if let Some(real_path) = self.dactyloscope.resolve(path) {
			return Decision::RewriteTrusted(real_path);
		}

		let Some(full_path) = self.dactyloscope.full_path(&real_path) else {
			return Decision::PassthroughUnknown;
		};
		match tokio::fs::metadata(&full_path).await {
			Ok(metadata) if metadata.is_file() => {}
			_ => {
				tracing::debug!("{} does not exist, forwarding", path);
				return Decision::PassthroughUnknown;
			}
		}

		match self.dactyloscope.fingerprint(&real_path).await {
			Ok(canonical) if canonical == path => Decision::RewriteFresh(real_path),
			Ok(canonical) => {
				tracing::debug!("{} is out of date (current: {}), forwarding", path, canonical);
				Decision::StaleReject {
					requested: path.to_string(),
					canonical,
				}
			}
			Err(e) => {
				tracing::warn!("Failed to fingerprint {}: {}", real_path, e);
				Decision::PassthroughError
			}
		}
	}
}

#[async_trait]
impl Middleware for FingerprintMiddleware {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		request
			.extensions
			.insert_if_absent::<Dactifier>(self.dactyloscope.dactifier());

		let path = request.path().to_string();
		let decision = self.decide(&path).await;

		let Some(real_path) = decision.rewrite_target() else {
			return next.handle(request).await;
		};

		if let Err(e) = request.set_path(real_path) {
			tracing::warn!("Cannot rewrite {} to {}: {}", path, real_path, e);
			return next.handle(request).await;
		}
		tracing::debug!("Serving {} as {} with long-lived caching", path, real_path);

		let mut response = next.handle(request).await?;
		if !response.set_header(CACHE_CONTROL.as_str(), &self.cache_control) {
			tracing::warn!("Invalid Cache-Control value: {}", self.cache_control);
		}
		Ok(response)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use dactyloscope_fingerprint::DactyloscopeConfig;
	use rstest::rstest;
	use tempfile::TempDir;

	#[rstest]
	#[case(31_556_926_000, false, "public, max-age=31556926")]
	#[case(60_000, true, "public, max-age=60, no-cache=\"set-cookie\"")]
	#[case(1_500, false, "public, max-age=1")]
	#[tokio::test]
	async fn test_cache_control_value(
		#[case] max_age: u64,
		#[case] strict: bool,
		#[case] expected: &str,
	) {
		let temp_dir = TempDir::new().unwrap();
		let config = DactyloscopeConfig::new(temp_dir.path())
			.with_max_age(max_age)
			.with_no_cache_set_cookie(strict);
		let middleware = FingerprintMiddleware::new(Dactyloscope::new(config).unwrap());

		assert_eq!(middleware.cache_control_value(), expected);
	}

	#[rstest]
	fn test_rewrite_target() {
		assert_eq!(
			Decision::RewriteFresh("/a.js".to_string()).rewrite_target(),
			Some("/a.js")
		);
		assert_eq!(Decision::PassthroughUnknown.rewrite_target(), None);
		assert_eq!(
			Decision::StaleReject {
				requested: "/a-dact-0.js".to_string(),
				canonical: "/a-dact-1.js".to_string(),
			}
			.rewrite_target(),
			None
		);
	}
}
