//! Fetching a single tile into the `z/x/y.ext` tree.
//!
//! [`TileFetcher::fetch`] never reports per-tile network or payload problems
//! as `Err`; those become [`FetchOutcome::Failed`] so that one missing tile
//! cannot stop a run. Only local filesystem faults are returned as errors.

use crate::{DownloadConfig, FileStore, HttpFetcherTrait, TileStoreTrait, UrlTemplate};
use anyhow::{Context, Result, bail};
use reqwest::Url;
use std::{
	fmt::{self, Display},
	fs, io,
	path::{Path, PathBuf},
	sync::Arc,
	time::Duration,
};
use tilepack_core::{Blob, TileCoord, TileFormat};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
	Downloaded,
	/// A usable tile was already on disk; no request was made.
	Skipped,
	Failed(FailureReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FailureReason {
	/// The server answered with a non-success status.
	Http(u16),
	Timeout,
	Transport(String),
	InvalidPayload(String),
	/// The tile could not be written; only used for faults that are not systemic.
	Storage(String),
}

impl FailureReason {
	/// Timeouts, transport errors, throttling and server errors may go away on retry.
	/// Other statuses, such as 404 outside the service's coverage, will not.
	pub fn is_transient(&self) -> bool {
		match self {
			FailureReason::Http(status) => matches!(status, 408 | 429 | 500..=599),
			FailureReason::Timeout | FailureReason::Transport(_) => true,
			FailureReason::InvalidPayload(_) | FailureReason::Storage(_) => false,
		}
	}
}

impl Display for FailureReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FailureReason::Http(status) => write!(f, "HTTP status {status}"),
			FailureReason::Timeout => f.write_str("request timed out"),
			FailureReason::Transport(message) => write!(f, "transport error: {message}"),
			FailureReason::InvalidPayload(message) => write!(f, "invalid payload: {message}"),
			FailureReason::Storage(message) => write!(f, "storage error: {message}"),
		}
	}
}

/// Downloads single tiles. Shared by all concurrent tasks of a run.
#[derive(Debug)]
pub struct TileFetcher {
	http: Arc<dyn HttpFetcherTrait>,
	store: Arc<dyn TileStoreTrait>,
	template: UrlTemplate,
	root: PathBuf,
	format: TileFormat,
	timeout: Duration,
	max_retries: u32,
	retry_delay: Duration,
	min_tile_size: u64,
	verify_existing: bool,
}

impl TileFetcher {
	/// Stores tiles with [`FileStore`].
	pub fn new(config: &DownloadConfig, http: Arc<dyn HttpFetcherTrait>) -> Result<TileFetcher> {
		TileFetcher::with_store(config, http, Arc::new(FileStore))
	}

	pub fn with_store(
		config: &DownloadConfig,
		http: Arc<dyn HttpFetcherTrait>,
		store: Arc<dyn TileStoreTrait>,
	) -> Result<TileFetcher> {
		Ok(TileFetcher {
			http,
			store,
			template: UrlTemplate::new(&config.url_template)?,
			root: config.output_dir.clone(),
			format: config.tile_format,
			timeout: config.timeout,
			max_retries: config.max_retries,
			retry_delay: config.retry_delay,
			min_tile_size: config.min_tile_size,
			verify_existing: config.verify_existing,
		})
	}

	/// `<root>/<z>/<x>/<y>.<ext>`
	pub fn tile_path(&self, coord: &TileCoord) -> PathBuf {
		self
			.root
			.join(coord.level.to_string())
			.join(coord.x.to_string())
			.join(format!("{}.{}", coord.y, self.format.as_extension()))
	}

	pub async fn fetch(&self, coord: &TileCoord) -> Result<FetchOutcome> {
		let path = self.tile_path(coord);
		if self.has_usable_tile(&path)? {
			log::trace!("tile {coord} exists, skipping");
			return Ok(FetchOutcome::Skipped);
		}

		let url = self.template.url_for(coord)?;
		let blob = match self.download(&url).await {
			Ok(blob) => blob,
			Err(reason) => return Ok(FetchOutcome::Failed(reason)),
		};

		if let Err(reason) = self.validate(&blob) {
			return Ok(FetchOutcome::Failed(reason));
		}

		self
			.store
			.write(&path, &blob)
			.with_context(|| format!("Failed to store tile {coord} at {path:?}"))?;
		log::trace!("tile {coord} stored ({} bytes)", blob.len());
		Ok(FetchOutcome::Downloaded)
	}

	/// Decides whether the file at `path` can stand in for a download.
	///
	/// Anything but a regular file is an error. Empty files are always removed. With `verify_existing`, files that are too
	/// small or carry the wrong signature are removed as well.
	fn has_usable_tile(&self, path: &Path) -> Result<bool> {
		let metadata = match fs::metadata(path) {
			Ok(metadata) => metadata,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
			Err(err) => return Err(err).with_context(|| format!("Failed to inspect {path:?}")),
		};

		if !metadata.is_file() {
			bail!("{path:?} exists but is not a file");
		}

		let usable = if metadata.len() == 0 {
			false
		} else if self.verify_existing {
			let blob = Blob::from(fs::read(path).with_context(|| format!("Failed to read {path:?}"))?);
			match self.validate(&blob) {
				Ok(()) => true,
				Err(reason) => {
					log::debug!("existing tile {path:?} will be fetched again: {reason}");
					false
				}
			}
		} else {
			true
		};

		if !usable {
			fs::remove_file(path).with_context(|| format!("Failed to remove unusable tile {path:?}"))?;
		}
		Ok(usable)
	}

	/// GET with retries for transient failures. Each attempt has its own timeout
	/// and the delay doubles after every retry.
	async fn download(&self, url: &Url) -> Result<Blob, FailureReason> {
		let mut attempt: u32 = 0;
		loop {
			let reason = match tokio::time::timeout(self.timeout, self.http.get(url)).await {
				Ok(Ok(response)) if response.is_success() => return Ok(response.body),
				Ok(Ok(response)) => FailureReason::Http(response.status),
				Ok(Err(err)) => FailureReason::Transport(format!("{err:#}")),
				Err(_) => FailureReason::Timeout,
			};

			if !reason.is_transient() || attempt >= self.max_retries {
				return Err(reason);
			}

			let delay = self.retry_delay.saturating_mul(1 << attempt.min(16));
			attempt += 1;
			log::debug!(
				"{reason} for {url}, retry {attempt}/{} in {:?}",
				self.max_retries,
				delay
			);
			tokio::time::sleep(delay).await;
		}
	}

	fn validate(&self, blob: &Blob) -> Result<(), FailureReason> {
		if blob.len() < self.min_tile_size {
			return Err(FailureReason::InvalidPayload(format!(
				"{} bytes is below the minimum of {} bytes",
				blob.len(),
				self.min_tile_size
			)));
		}
		if !self.format.matches_signature(blob.as_slice()) {
			return Err(FailureReason::InvalidPayload(format!(
				"content is not {}: {blob:?}",
				self.format.as_mime_str()
			)));
		}
		Ok(())
	}
}

/// `true` if the error was caused by a condition that affects every further
/// write, such as a full disk or a read-only filesystem.
pub fn is_systemic_fault(err: &anyhow::Error) -> bool {
	err.chain().any(|cause| {
		cause.downcast_ref::<io::Error>().is_some_and(|io_err| {
			matches!(
				io_err.kind(),
				io::ErrorKind::StorageFull | io::ErrorKind::ReadOnlyFilesystem
			)
		})
	})
}
