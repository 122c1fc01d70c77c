use super::resolve_path;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tilepack_container::PackageConfig;
use tilepack_core::TileFormat;

/// The `package:` section.
#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
	/// Root directory of the tile tree
	pub input: Option<PathBuf>,
	/// MBTiles file to create
	pub output: Option<PathBuf>,
	pub format: Option<TileFormat>,
	pub name: Option<String>,
	pub attribution: Option<String>,
	pub description: Option<String>,
	pub min_tile_size: Option<u64>,
	pub batch_size: Option<usize>,
}

impl PackageSection {
	pub(super) fn resolve_paths(&mut self, base: &Path) {
		resolve_path(&mut self.input, base);
		resolve_path(&mut self.output, base);
	}

	pub fn apply_to(&self, config: &mut PackageConfig) {
		if let Some(input) = &self.input {
			config.input_dir.clone_from(input);
		}
		if let Some(output) = &self.output {
			config.output.clone_from(output);
		}
		if let Some(format) = self.format {
			config.tile_format = format;
		}
		if let Some(name) = &self.name {
			config.name.clone_from(name);
		}
		if let Some(attribution) = &self.attribution {
			config.attribution.clone_from(attribution);
		}
		if self.description.is_some() {
			config.description.clone_from(&self.description);
		}
		if let Some(min_tile_size) = self.min_tile_size {
			config.min_tile_size = min_tile_size;
		}
		if let Some(batch_size) = self.batch_size {
			config.batch_size = batch_size;
		}
	}
}
