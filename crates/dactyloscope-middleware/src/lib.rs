//! # Dactyloscope Middleware
//!
//! Request interception for fingerprinted static-asset URLs.
//!
//! [`FingerprintMiddleware`] sits in front of whatever serves files from the
//! asset root. For each request it decides one of:
//!
//! - **rewrite**: the path carries a fingerprint matching the file's
//!   current content; the request is forwarded with the real path and the
//!   response gets `Cache-Control: public, max-age=<seconds>`
//! - **pass through**: no fingerprint, unknown file, stale fingerprint or
//!   an unreadable file; the request is forwarded unchanged and no cache
//!   header is added
//!
//! No failure here ever becomes an error response of its own.
//!
//! ## Module Structure
//!
//! - [`fingerprint`] - The interceptor and its [`Decision`] type

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod fingerprint;

pub use fingerprint::{Decision, FingerprintMiddleware};
