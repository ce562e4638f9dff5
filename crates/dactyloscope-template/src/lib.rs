//! # Dactyloscope Template
//!
//! Tera integration for fingerprinted asset URLs.
//!
//! Registers `dactify` both as a function and as a filter:
//!
//! ```tera
//! <link rel="stylesheet" href="{{ dactify(path="/css/site.css") }}">
//! <script src="{{ "/js/app.js" | dactify }}"></script>
//! ```
//!
//! Rendering never waits on file I/O. A path that has not been fingerprinted
//! yet renders as `prefix + path` and is queued, so the next render emits
//! the fingerprinted URL.

#![warn(missing_docs)]

use dactyloscope_fingerprint::Dactifier;
use std::collections::HashMap;
use tera::{Result as TeraResult, Tera, Value};

/// Name the helper is registered under
pub const DACTIFY: &str = "dactify";

/// `dactify` helper bound to one store
#[derive(Debug, Clone)]
pub struct DactifyFunction {
	dactifier: Dactifier,
}

impl DactifyFunction {
	/// Wraps a dactify handle
	pub fn new(dactifier: Dactifier) -> Self {
		Self { dactifier }
	}

	fn render(&self, path: &Value) -> TeraResult<Value> {
		let path = path
			.as_str()
			.ok_or_else(|| tera::Error::msg("dactify requires a string path"))?;
		Ok(Value::String(self.dactifier.dactify(path)))
	}
}

impl tera::Function for DactifyFunction {
	fn call(&self, args: &HashMap<String, Value>) -> TeraResult<Value> {
		let path = args
			.get("path")
			.ok_or_else(|| tera::Error::msg("dactify requires a 'path' argument"))?;
		self.render(path)
	}
}

impl tera::Filter for DactifyFunction {
	fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> TeraResult<Value> {
		self.render(value)
	}
}

/// Installs the `dactify` function and filter on `tera`
///
/// # Example
///
/// ```rust,no_run
/// use dactyloscope_fingerprint::{Dactyloscope, DactyloscopeConfig};
/// use tera::{Context, Tera};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let dactyloscope = Dactyloscope::new(DactyloscopeConfig::new("public"))?;
/// dactyloscope.pregenerate_all().await?;
///
/// let mut tera = Tera::default();
/// dactyloscope_template::register(&mut tera, dactyloscope.dactifier());
///
/// let html = tera.render_str(r#"{{ dactify(path="/css/site.css") }}"#, &Context::new())?;
/// assert!(html.starts_with("/css/site-dact-"));
/// # Ok(())
/// # }
/// ```
pub fn register(tera: &mut Tera, dactifier: Dactifier) {
	let helper = DactifyFunction::new(dactifier);
	tera.register_function(DACTIFY, helper.clone());
	tera.register_filter(DACTIFY, helper);
}
