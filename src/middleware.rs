//! Middleware module.
//!
//! This module provides the fingerprinted URL interceptor.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dactyloscope::middleware::{Decision, FingerprintMiddleware};
//! ```

pub use dactyloscope_middleware::*;
