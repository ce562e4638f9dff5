//! Template module.
//!
//! This module provides the Tera `dactify` helper.

pub use dactyloscope_template::*;
