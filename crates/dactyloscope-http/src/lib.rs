//! # Dactyloscope HTTP
//!
//! Minimal request/response model and middleware traits used by the
//! fingerprinting interceptor.
//!
//! The types intentionally stay small: a [`Request`] carries the method,
//! URI, headers, body and a type-keyed [`Extensions`] bag; a [`Response`]
//! carries status, headers and body. Middleware composes through
//! [`Middleware`], [`Handler`] and [`MiddlewareChain`].
//!
//! ## Module Structure
//!
//! - [`request`] - Request type and builder
//! - [`response`] - Response type
//! - [`extensions`] - Type-safe per-request storage
//! - [`middleware`] - Handler and middleware traits
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod extensions;
pub mod middleware;
pub mod request;
pub mod response;

pub use error::{Error, Result};
pub use extensions::Extensions;
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{Request, RequestBuilder};
pub use response::Response;
