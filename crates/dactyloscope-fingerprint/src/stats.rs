//! Lookup and computation counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters shared by every handle of a [`crate::Dactyloscope`]
#[derive(Debug, Default)]
pub struct CacheStats {
	hits: AtomicU64,
	misses: AtomicU64,
	computations: AtomicU64,
	failures: AtomicU64,
}

/// Copy of [`CacheStats`] at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
	/// Lookups answered from the cache
	pub hits: u64,
	/// Lookups that found nothing cached
	pub misses: u64,
	/// Digest computations started
	pub computations: u64,
	/// Digest computations that failed
	pub failures: u64,
}

impl CacheStats {
	pub(crate) fn record_hit(&self) {
		self.hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_miss(&self) {
		self.misses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_computation(&self) {
		self.computations.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}

	/// Current counter values
	pub fn snapshot(&self) -> StatsSnapshot {
		StatsSnapshot {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			computations: self.computations.load(Ordering::Relaxed),
			failures: self.failures.load(Ordering::Relaxed),
		}
	}
}
