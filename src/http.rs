//! HTTP module.
//!
//! This module provides the request, response and middleware primitives the
//! interceptor is built on.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dactyloscope::http::{Handler, Middleware, MiddlewareChain, Request, Response};
//! ```

pub use dactyloscope_http::*;
