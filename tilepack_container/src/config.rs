use anyhow::{Result, ensure};
use std::path::PathBuf;
use tilepack_core::TileFormat;

pub const DEFAULT_NAME: &str = "SHOM Marine Charts";
pub const DEFAULT_ATTRIBUTION: &str = "SHOM - Service Hydrographique et Océanographique de la Marine";

/// Settings of one packaging run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageConfig {
	/// Root of the `z/x/y.ext` tile tree.
	pub input_dir: PathBuf,
	pub output: PathBuf,
	pub tile_format: TileFormat,
	pub name: String,
	/// Must name the data provider.
	pub attribution: String,
	/// Generated from the bounds when `None`.
	pub description: Option<String>,
	/// Files smaller than this are skipped.
	pub min_tile_size: u64,
	/// Tiles inserted per transaction.
	pub batch_size: usize,
	/// Replace an existing archive instead of refusing to write.
	pub overwrite: bool,
}

impl Default for PackageConfig {
	fn default() -> Self {
		PackageConfig {
			input_dir: PathBuf::from("shom_tiles_complete"),
			output: PathBuf::from("shom_marine_charts.mbtiles"),
			tile_format: TileFormat::PNG,
			name: DEFAULT_NAME.to_string(),
			attribution: DEFAULT_ATTRIBUTION.to_string(),
			description: None,
			min_tile_size: 100,
			batch_size: 1000,
			overwrite: false,
		}
	}
}

impl PackageConfig {
	pub fn validate(&self) -> Result<()> {
		ensure!(!self.name.trim().is_empty(), "archive name must not be empty");
		ensure!(
			!self.attribution.trim().is_empty(),
			"attribution must name the data provider"
		);
		ensure!(self.batch_size > 0, "batch size must be at least 1");
		Ok(())
	}
}
