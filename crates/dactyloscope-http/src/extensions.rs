//! Type-keyed per-request storage
//!
//! Middleware uses this bag to hand values (such as a dactify handle) to
//! downstream handlers and templates rendering the response.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Type-keyed value storage shared by clones of the same request
#[derive(Clone, Default)]
pub struct Extensions {
	map: Arc<Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl Extensions {
	/// Creates an empty bag
	///
	/// # Examples
	///
	/// ```
	/// use dactyloscope_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// assert!(!extensions.contains::<String>());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value`, replacing any previous value of the same type
	///
	/// # Examples
	///
	/// ```
	/// use dactyloscope_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// extensions.insert("/static".to_string());
	/// assert_eq!(extensions.get::<String>().as_deref(), Some("/static"));
	/// ```
	pub fn insert<T: Send + Sync + 'static>(&self, value: T) {
		let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.insert(TypeId::of::<T>(), Box::new(value));
	}

	/// Stores `value` only when no value of the same type is present
	///
	/// Returns `true` when the value was stored.
	///
	/// # Examples
	///
	/// ```
	/// use dactyloscope_http::Extensions;
	///
	/// let extensions = Extensions::new();
	/// assert!(extensions.insert_if_absent(1u8));
	/// assert!(!extensions.insert_if_absent(2u8));
	/// assert_eq!(extensions.get::<u8>(), Some(1));
	/// ```
	pub fn insert_if_absent<T: Send + Sync + 'static>(&self, value: T) -> bool {
		let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		if map.contains_key(&TypeId::of::<T>()) {
			return false;
		}
		map.insert(TypeId::of::<T>(), Box::new(value));
		true
	}

	/// Returns a clone of the stored value of type `T`
	pub fn get<T>(&self) -> Option<T>
	where
		T: Clone + Send + Sync + 'static,
	{
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.get(&TypeId::of::<T>())
			.and_then(|boxed| boxed.downcast_ref::<T>())
			.cloned()
	}

	/// Checks whether a value of type `T` is stored
	pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
		let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		map.contains_key(&TypeId::of::<T>())
	}

	/// Removes and returns the stored value of type `T`
	pub fn remove<T>(&self) -> Option<T>
	where
		T: Send + Sync + 'static,
	{
		let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
		let boxed = map.remove(&TypeId::of::<T>())?;
		boxed.downcast::<T>().ok().map(|value| *value)
	}
}

impl std::fmt::Debug for Extensions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let len = self.map.lock().map(|map| map.len()).unwrap_or(0);
		f.debug_struct("Extensions").field("len", &len).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[derive(Clone, Debug, PartialEq)]
	struct Marker(&'static str);

	#[rstest]
	fn test_insert_and_get() {
		let extensions = Extensions::new();
		extensions.insert(Marker("a"));

		assert_eq!(extensions.get::<Marker>(), Some(Marker("a")));
		assert_eq!(extensions.get::<String>(), None);
	}

	#[rstest]
	fn test_insert_if_absent_keeps_first_value() {
		let extensions = Extensions::new();

		assert!(extensions.insert_if_absent(Marker("first")));
		assert!(!extensions.insert_if_absent(Marker("second")));
		assert_eq!(extensions.get::<Marker>(), Some(Marker("first")));
	}

	#[rstest]
	fn test_clones_share_storage() {
		let extensions = Extensions::new();
		let clone = extensions.clone();
		clone.insert(7u32);

		assert!(extensions.contains::<u32>());
	}

	#[rstest]
	fn test_remove() {
		let extensions = Extensions::new();
		extensions.insert(Marker("gone"));

		assert_eq!(extensions.remove::<Marker>(), Some(Marker("gone")));
		assert!(!extensions.contains::<Marker>());
		assert_eq!(extensions.remove::<Marker>(), None);
	}
}
