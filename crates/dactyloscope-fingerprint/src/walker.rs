//! Bulk precomputation over the asset tree
//!
//! Enumeration runs on a blocking thread and streams real paths to a
//! consumer that keeps at most `concurrency` digests in flight. The walk
//! is only complete once every spawned digest has been joined.

use crate::service::{Dactyloscope, Shared};
use crate::{DactError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinHandle, JoinSet};
use walkdir::WalkDir;

const DISCOVERY_BUFFER: usize = 256;

/// Outcome of [`Dactyloscope::pregenerate_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PregenerateReport {
	/// Regular files found under the root
	pub discovered: usize,
	/// Files whose fingerprint is now cached
	pub fingerprinted: usize,
	/// Files that could not be fingerprinted
	pub failed: usize,
}

impl Dactyloscope {
	/// Fingerprints every regular file under the root
	///
	/// Symlinks are not followed. Unreadable entries below the root are
	/// logged and skipped; per-file digest failures are logged and counted.
	///
	/// # Errors
	///
	/// [`DactError::Walk`] when the root itself cannot be read.
	pub async fn pregenerate_all(&self) -> Result<PregenerateReport> {
		let shared = Arc::clone(&self.shared);
		let root = shared.config.root_path.clone();
		let (sender, receiver) = mpsc::channel(DISCOVERY_BUFFER);

		let discovery = tokio::task::spawn_blocking(move || discover(&root, sender));

		let report = run_bounded(receiver, shared.config.concurrency, |real_path| {
			let shared = Arc::clone(&shared);
			async move { fingerprint_one(&shared, real_path).await }
		})
		.await?;

		discovery
			.await
			.map_err(|e| DactError::Runtime(e.to_string()))??;

		tracing::info!(
			"Precomputed fingerprints for {} of {} files ({} failed)",
			report.fingerprinted,
			report.discovered,
			report.failed
		);
		Ok(report)
	}

	/// Runs [`pregenerate_all`](Self::pregenerate_all) in the background
	///
	/// `on_complete` is called exactly once, with the report or the error
	/// that stopped the walk.
	pub fn spawn_pregenerate<F>(&self, on_complete: F) -> JoinHandle<()>
	where
		F: FnOnce(Result<PregenerateReport>) + Send + 'static,
	{
		let dactyloscope = self.clone();
		tokio::spawn(async move {
			on_complete(dactyloscope.pregenerate_all().await);
		})
	}
}

/// Runs `work` for every received path, at most `width` at a time
///
/// Returns once the channel is closed and every spawned task has been
/// joined.
async fn run_bounded<F, Fut>(
	mut receiver: mpsc::Receiver<String>,
	width: usize,
	work: F,
) -> Result<PregenerateReport>
where
	F: Fn(String) -> Fut,
	Fut: Future<Output = std::result::Result<(), String>> + Send + 'static,
{
	let permits = Arc::new(Semaphore::new(width));
	let mut report = PregenerateReport::default();
	let mut in_flight = JoinSet::new();

	while let Some(real_path) = receiver.recv().await {
		report.discovered += 1;

		let permit = Arc::clone(&permits)
			.acquire_owned()
			.await
			.map_err(|e| DactError::Runtime(e.to_string()))?;
		let task = work(real_path);
		in_flight.spawn(async move {
			let _permit = permit;
			task.await
		});

		while let Some(joined) = in_flight.try_join_next() {
			tally(&mut report, joined);
		}
	}

	while let Some(joined) = in_flight.join_next().await {
		tally(&mut report, joined);
	}
	Ok(report)
}

async fn fingerprint_one(shared: &Shared, real_path: String) -> std::result::Result<(), String> {
	match shared.ensure(&real_path).await {
		Ok(_) => Ok(()),
		Err(e) => {
			tracing::warn!("Failed to fingerprint {}: {}", real_path, e);
			Err(real_path)
		}
	}
}

fn tally(
	report: &mut PregenerateReport,
	joined: std::result::Result<std::result::Result<(), String>, tokio::task::JoinError>,
) {
	match joined {
		Ok(Ok(())) => report.fingerprinted += 1,
		Ok(Err(_)) => report.failed += 1,
		Err(e) => {
			tracing::warn!("Fingerprint task did not complete: {}", e);
			report.failed += 1;
		}
	}
}

/// Sends the real path of every regular file under `root`
fn discover(root: &Path, sender: mpsc::Sender<String>) -> Result<()> {
	for entry in WalkDir::new(root).follow_links(false) {
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) if e.depth() == 0 => return Err(DactError::Walk(e)),
			Err(e) => {
				tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
				continue;
			}
		};

		if !entry.file_type().is_file() {
			continue;
		}

		let Some(real_path) = real_path_of(root, entry.path()) else {
			tracing::warn!("Skipping non UTF-8 path: {}", entry.path().display());
			continue;
		};
		if sender.blocking_send(real_path).is_err() {
			break;
		}
	}
	Ok(())
}

/// `/`-separated path relative to `root`, with a leading `/`
fn real_path_of(root: &Path, path: &Path) -> Option<String> {
	let relative: PathBuf = path.strip_prefix(root).ok()?.to_path_buf();
	let mut real_path = String::new();
	for component in relative.components() {
		real_path.push('/');
		real_path.push_str(component.as_os_str().to_str()?);
	}
	(!real_path.is_empty()).then_some(real_path)
}
