use crate::{HttpOptions, SHOM_WMTS_TEMPLATE, UrlTemplate};
use anyhow::{Result, ensure};
use std::{path::PathBuf, time::Duration};
use tilepack_core::{ConcurrencyLimits, GeoBBox, TileFormat};

pub const DEFAULT_USER_AGENT: &str =
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/119.0";

/// Upper bound for parallel requests against a single tile service.
pub const MAX_CONCURRENCY: usize = 8;

/// Settings of one download run. Built once and never mutated while the run is in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadConfig {
	pub bbox: GeoBBox,
	pub min_zoom: u8,
	pub max_zoom: u8,
	/// Root of the `z/x/y.ext` tile tree.
	pub output_dir: PathBuf,
	pub url_template: String,
	pub tile_format: TileFormat,
	pub concurrency: usize,
	/// Per-request timeout, applied to each attempt separately.
	pub timeout: Duration,
	/// Retries after the first attempt for transient failures.
	pub max_retries: u32,
	/// Delay before the first retry; doubled for each further retry.
	pub retry_delay: Duration,
	/// Payloads shorter than this are treated as error placeholders.
	pub min_tile_size: u64,
	/// Re-check signature and size of tiles already on disk instead of trusting them.
	pub verify_existing: bool,
	pub user_agent: String,
	pub headers: Vec<(String, String)>,
	/// Number of processed tiles between two progress log lines.
	pub progress_interval: u64,
}

impl Default for DownloadConfig {
	fn default() -> Self {
		DownloadConfig {
			bbox: GeoBBox {
				min_lon: -5.0,
				min_lat: 47.0,
				max_lon: 2.0,
				max_lat: 50.0,
			},
			min_zoom: 8,
			max_zoom: 14,
			output_dir: PathBuf::from("shom_tiles_complete"),
			url_template: SHOM_WMTS_TEMPLATE.to_string(),
			tile_format: TileFormat::PNG,
			concurrency: ConcurrencyLimits::default().capped(MAX_CONCURRENCY).io_bound,
			timeout: Duration::from_secs(30),
			max_retries: 3,
			retry_delay: Duration::from_secs(1),
			min_tile_size: 1000,
			verify_existing: false,
			user_agent: DEFAULT_USER_AGENT.to_string(),
			headers: default_headers(),
			progress_interval: 100,
		}
	}
}

impl DownloadConfig {
	/// Checks the settings that cannot be expressed by the field types.
	pub fn validate(&self) -> Result<()> {
		ensure!(
			self.min_zoom <= self.max_zoom,
			"min zoom ({}) must not be greater than max zoom ({})",
			self.min_zoom,
			self.max_zoom
		);
		ensure!(self.concurrency > 0, "concurrency must be at least 1");
		ensure!(!self.timeout.is_zero(), "timeout must be greater than zero");
		ensure!(self.progress_interval > 0, "progress interval must be at least 1");
		UrlTemplate::new(&self.url_template)?;
		Ok(())
	}

	pub fn http_options(&self) -> HttpOptions {
		HttpOptions {
			timeout: self.timeout,
			user_agent: self.user_agent.clone(),
			headers: self.headers.clone(),
		}
	}
}

/// Headers a browser sends to the SHOM viewer's tile service.
pub fn default_headers() -> Vec<(String, String)> {
	[
		("Accept", "image/avif,image/webp,*/*"),
		("Accept-Language", "fr,fr-FR;q=0.8,en-US;q=0.5,en;q=0.3"),
		("Referer", "https://data.shom.fr/"),
		("Origin", "https://data.shom.fr"),
	]
	.into_iter()
	.map(|(k, v)| (k.to_string(), v.to_string()))
	.collect()
}
