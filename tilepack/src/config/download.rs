use super::resolve_path;
use serde::Deserialize;
use std::{
	collections::BTreeMap,
	path::{Path, PathBuf},
	time::Duration,
};
use tilepack_core::{GeoBBox, TileFormat};
use tilepack_download::DownloadConfig;

/// The `download:` section. Every field is optional and falls back to the built-in default.
#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DownloadSection {
	/// `[west, south, east, north]` in degrees
	pub bbox: Option<GeoBBox>,
	pub min_zoom: Option<u8>,
	pub max_zoom: Option<u8>,
	/// Root directory of the tile tree
	pub output: Option<PathBuf>,
	/// Tile URL with `{z}`, `{x}` and `{y}` placeholders
	pub url: Option<String>,
	pub format: Option<TileFormat>,
	pub concurrency: Option<usize>,
	pub timeout_seconds: Option<f64>,
	pub max_retries: Option<u32>,
	pub retry_delay_seconds: Option<f64>,
	pub min_tile_size: Option<u64>,
	pub verify_existing: Option<bool>,
	pub user_agent: Option<String>,
	/// Replaces the default request headers
	pub headers: Option<BTreeMap<String, String>>,
	pub progress_interval: Option<u64>,
}

impl DownloadSection {
	pub(super) fn resolve_paths(&mut self, base: &Path) {
		resolve_path(&mut self.output, base);
	}

	/// Overrides the fields of `config` that are set in this section.
	pub fn apply_to(&self, config: &mut DownloadConfig) -> anyhow::Result<()> {
		if let Some(bbox) = self.bbox {
			config.bbox = bbox;
		}
		if let Some(min_zoom) = self.min_zoom {
			config.min_zoom = min_zoom;
		}
		if let Some(max_zoom) = self.max_zoom {
			config.max_zoom = max_zoom;
		}
		if let Some(output) = &self.output {
			config.output_dir.clone_from(output);
		}
		if let Some(url) = &self.url {
			config.url_template.clone_from(url);
		}
		if let Some(format) = self.format {
			config.tile_format = format;
		}
		if let Some(concurrency) = self.concurrency {
			config.concurrency = concurrency;
		}
		if let Some(seconds) = self.timeout_seconds {
			config.timeout = Duration::try_from_secs_f64(seconds)?;
		}
		if let Some(max_retries) = self.max_retries {
			config.max_retries = max_retries;
		}
		if let Some(seconds) = self.retry_delay_seconds {
			config.retry_delay = Duration::try_from_secs_f64(seconds)?;
		}
		if let Some(min_tile_size) = self.min_tile_size {
			config.min_tile_size = min_tile_size;
		}
		if let Some(verify_existing) = self.verify_existing {
			config.verify_existing = verify_existing;
		}
		if let Some(user_agent) = &self.user_agent {
			config.user_agent.clone_from(user_agent);
		}
		if let Some(headers) = &self.headers {
			config.headers = headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
		}
		if let Some(progress_interval) = self.progress_interval {
			config.progress_interval = progress_interval;
		}
		Ok(())
	}
}
