//! Runs a download over every tile of a [`TilePlan`].
//!
//! Zoom levels are processed one after another in ascending order. Within a
//! level up to `concurrency` fetches are in flight; their outcomes are
//! consumed by a single loop that owns the counters.

use crate::{
	DownloadConfig, DownloadReport, DownloadStats, FailureReason, FetchOutcome, FileStore, HttpFetcher,
	HttpFetcherTrait, TileFetcher, TileStoreTrait, is_systemic_fault,
};
use anyhow::{Context, Result};
use futures::{StreamExt, stream};
use std::sync::Arc;
use tilepack_core::{GeoBBox, TilePlan, TileRange, progress::get_progress_bar};

/// Failures logged at warn level per zoom level. Further failures go to debug.
const MAX_LOGGED_FAILURES: u64 = 5;

#[derive(Debug)]
pub struct DownloadOrchestrator {
	fetcher: TileFetcher,
	concurrency: usize,
	progress_interval: u64,
}

impl DownloadOrchestrator {
	/// Uses a reqwest client configured from `config`.
	pub fn new(config: &DownloadConfig) -> Result<DownloadOrchestrator> {
		let http = HttpFetcher::new(&config.http_options())?;
		DownloadOrchestrator::with_http(config, Arc::new(http))
	}

	pub fn with_http(config: &DownloadConfig, http: Arc<dyn HttpFetcherTrait>) -> Result<DownloadOrchestrator> {
		DownloadOrchestrator::with_store(config, http, Arc::new(FileStore))
	}

	pub fn with_store(
		config: &DownloadConfig,
		http: Arc<dyn HttpFetcherTrait>,
		store: Arc<dyn TileStoreTrait>,
	) -> Result<DownloadOrchestrator> {
		config.validate()?;
		Ok(DownloadOrchestrator {
			fetcher: TileFetcher::with_store(config, http, store)?,
			concurrency: config.concurrency,
			progress_interval: config.progress_interval,
		})
	}

	/// Downloads all tiles covering `bbox` on zoom levels `min_zoom..=max_zoom`.
	///
	/// Per-tile failures are counted in the report. An `Err` is returned only for
	/// an invalid request or a filesystem fault that makes further writes pointless.
	pub async fn run(&self, bbox: &GeoBBox, min_zoom: u8, max_zoom: u8) -> Result<DownloadReport> {
		let plan = TilePlan::new(bbox, min_zoom, max_zoom)?;
		self.run_plan(&plan).await
	}

	pub async fn run_plan(&self, plan: &TilePlan) -> Result<DownloadReport> {
		log::info!(
			"downloading {} tiles for {} with {} parallel requests",
			plan.count_tiles(),
			plan.bbox(),
			self.concurrency
		);

		let mut report = DownloadReport::default();
		for range in plan.iter() {
			let stats = self
				.run_level(range)
				.await
				.with_context(|| format!("Failed to download zoom level {}", range.level))?;
			report.insert_level(range.level, stats);
		}

		let total = report.total();
		log::info!("download finished: {total}");
		if total.failed > 0 {
			log::warn!("{} tiles could not be downloaded", total.failed);
		}
		Ok(report)
	}

	async fn run_level(&self, range: &TileRange) -> Result<DownloadStats> {
		let level = range.level;
		let mut stats = DownloadStats::new(range.count_tiles());
		log::info!("zoom {level}: {range}, {} tiles", stats.expected);

		let progress = get_progress_bar(&format!("zoom {level}"), stats.expected);
		let fetcher = &self.fetcher;
		let mut outcomes = stream::iter(range.iter_coords())
			.map(|coord| async move { (coord, fetcher.fetch(&coord).await) })
			.buffer_unordered(self.concurrency);

		while let Some((coord, result)) = outcomes.next().await {
			let outcome = match result {
				Ok(outcome) => outcome,
				Err(err) if is_systemic_fault(&err) => {
					progress.finish();
					return Err(err.context(format!("aborting at tile {coord}")));
				}
				Err(err) => FetchOutcome::Failed(FailureReason::Storage(format!("{err:#}"))),
			};

			if let FetchOutcome::Failed(reason) = &outcome {
				if stats.failed < MAX_LOGGED_FAILURES {
					log::warn!("tile {coord} failed: {reason}");
				} else {
					log::debug!("tile {coord} failed: {reason}");
				}
			}

			stats.record(&outcome);
			progress.inc(1);
			if stats.processed() % self.progress_interval == 0 {
				log::info!("zoom {level}: {}/{} processed", stats.processed(), stats.expected);
			}
		}
		progress.finish();

		if stats.failed > MAX_LOGGED_FAILURES {
			log::warn!(
				"zoom {level}: {} more failures not shown",
				stats.failed - MAX_LOGGED_FAILURES
			);
		}
		log::info!("zoom {level}: {stats}");
		Ok(stats)
	}
}
