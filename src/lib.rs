//! # Dactyloscope
//!
//! Cache-busting static asset URLs based on content fingerprints.
//!
//! Every asset URL handed to clients embeds the MD5 digest of the file it
//! points at, so responses can be cached for a year and a content change
//! still produces a new URL:
//!
//! ```text
//! /css/site.css  ->  /css/site-dact-5d41402abc4b2a76b9719d911017c592.css
//! ```
//!
//! ## Feature Flags
//!
//! - `minimal` - Fingerprint engine, path codec, cache and walker only
//! - `middleware` - [`FingerprintMiddleware`](middleware::FingerprintMiddleware)
//! - `template` - Tera `dactify` helper
//! - `full` (default) - Everything
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use dactyloscope::prelude::*;
//! use std::sync::Arc;
//!
//! struct StaticFiles;
//!
//! #[async_trait]
//! impl Handler for StaticFiles {
//!     async fn handle(&self, request: Request) -> dactyloscope::http::Result<Response> {
//!         Ok(Response::ok().with_body(request.path().to_string()))
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DactyloscopeConfig::from_file("dactyloscope.toml".as_ref())?;
//! let dactyloscope = Dactyloscope::new(config)?;
//!
//! // Warm the cache in the background while serving
//! dactyloscope.spawn_pregenerate(|result| {
//!     if let Err(e) = result {
//!         eprintln!("precomputation stopped: {e}");
//!     }
//! });
//!
//! let app = MiddlewareChain::new(Arc::new(StaticFiles))
//!     .with_middleware(Arc::new(FingerprintMiddleware::new(dactyloscope.clone())));
//! # Ok(())
//! # }
//! ```

pub mod http;
#[cfg(feature = "middleware")]
pub mod middleware;
#[cfg(feature = "template")]
pub mod template;

pub use dactyloscope_fingerprint::*;

pub mod prelude {
	//! Commonly used types

	pub use crate::http::{Handler, Middleware, MiddlewareChain, Request, Response};
	pub use crate::{Dactifier, DactError, Dactyloscope, DactyloscopeConfig};
	pub use async_trait::async_trait;

	#[cfg(feature = "middleware")]
	pub use crate::middleware::{Decision, FingerprintMiddleware};

	#[cfg(feature = "template")]
	pub use crate::template::DactifyFunction;
}
