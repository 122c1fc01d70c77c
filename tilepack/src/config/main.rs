use super::{DownloadSection, PackageSection};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

/// Settings file, for example:
///
/// ```yaml
/// download:
///   bbox: [-5.0, 47.0, 2.0, 50.0]
///   max_zoom: 12
///   concurrency: 4
/// package:
///   output: brittany.mbtiles
///   name: Brittany Coast
/// ```
#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	#[serde(default)]
	pub download: DownloadSection,

	#[serde(default)]
	pub package: PackageSection,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses a file. Relative paths inside it are resolved against the file's directory.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		let mut config =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))?;

		if let Some(base) = path.parent() {
			config.download.resolve_paths(base);
			config.package.resolve_paths(base);
		}
		Ok(config)
	}
}
