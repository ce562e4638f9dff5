//! Background cache filling for non-blocking dactify calls

use crate::service::Shared;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{Semaphore, mpsc};

/// Queue of real paths awaiting a digest
///
/// A path stays in `pending` from enqueue until its computation finishes,
/// so repeated misses for the same path queue it only once. The worker
/// stops when the last sender is dropped.
pub(crate) struct BackgroundFiller {
	sender: mpsc::UnboundedSender<String>,
	pending: Arc<Mutex<HashSet<String>>>,
}

impl BackgroundFiller {
	pub(crate) fn spawn(shared: Arc<Shared>, handle: &Handle) -> Self {
		let (sender, receiver) = mpsc::unbounded_channel();
		let pending = Arc::new(Mutex::new(HashSet::new()));

		handle.spawn(run(shared, receiver, Arc::clone(&pending)));

		Self { sender, pending }
	}

	/// Queues `real_path`; `false` if it is already queued or the worker is gone
	pub(crate) fn enqueue(&self, real_path: &str) -> bool {
		if !self.pending.lock().insert(real_path.to_string()) {
			return false;
		}

		if self.sender.send(real_path.to_string()).is_err() {
			self.pending.lock().remove(real_path);
			return false;
		}
		true
	}

	pub(crate) fn pending_len(&self) -> usize {
		self.pending.lock().len()
	}
}

async fn run(
	shared: Arc<Shared>,
	mut receiver: mpsc::UnboundedReceiver<String>,
	pending: Arc<Mutex<HashSet<String>>>,
) {
	let permits = Arc::new(Semaphore::new(shared.config.concurrency));

	while let Some(real_path) = receiver.recv().await {
		let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
			break;
		};
		let shared = Arc::clone(&shared);
		let pending = Arc::clone(&pending);

		tokio::spawn(async move {
			let _permit = permit;
			if let Err(e) = shared.ensure(&real_path).await {
				tracing::warn!("Background fingerprinting failed for {}: {}", real_path, e);
			}
			pending.lock().remove(&real_path);
		});
	}

	tracing::debug!("Background filler stopped");
}
