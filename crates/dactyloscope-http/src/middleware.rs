//! Middleware and handler traits for HTTP request processing.
//!
//! ## Handler
//!
//! ```rust
//! use dactyloscope_http::{Handler, Request, Response, Result};
//! use async_trait::async_trait;
//!
//! struct AssetHandler;
//!
//! #[async_trait]
//! impl Handler for AssetHandler {
//!     async fn handle(&self, request: Request) -> Result<Response> {
//!         Ok(Response::ok().with_body(request.path().to_string()))
//!     }
//! }
//! ```
//!
//! ## Middleware
//!
//! Middleware wraps a handler, may rewrite the request before calling
//! `next`, and may adjust the response afterwards:
//!
//! ```rust
//! use dactyloscope_http::{Handler, Middleware, Request, Response, Result};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct NoSniff;
//!
//! #[async_trait]
//! impl Middleware for NoSniff {
//!     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
//!         let response = next.handle(request).await?;
//!         Ok(response.with_header("X-Content-Type-Options", "nosniff"))
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Handler trait for processing requests.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request through this middleware.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware runs for the given request.
	///
	/// Skipped middleware is removed from the chain for that request.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Composes middleware in front of a handler.
///
/// Middleware runs in the order it was added; the first added sees the
/// request first and the response last.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	/// Creates a chain ending in `handler`.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware using builder pattern.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Adds a middleware in place.
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		let mut current: Arc<dyn Handler> = self.handler.clone();

		for middleware in self
			.middlewares
			.iter()
			.rev()
			.filter(|mw| mw.should_continue(&request))
		{
			current = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current,
			});
		}

		current.handle(request).await
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}
