use crate::config::Config;
use anyhow::Result;
use std::{path::PathBuf, time::Duration};
use tilepack_core::{GeoBBox, TileFormat};
use tilepack_download::{DownloadConfig, DownloadOrchestrator};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true)]
pub struct Subcommand {
	/// area to download as west,south,east,north in degrees
	/// [default: -5,47,2,50]
	#[arg(long, value_name = "BBOX", allow_hyphen_values = true, verbatim_doc_comment)]
	bbox: Option<GeoBBox>,

	/// lowest zoom level [default: 8]
	#[arg(long, value_name = "INT")]
	min_zoom: Option<u8>,

	/// highest zoom level [default: 14]
	#[arg(long, value_name = "INT")]
	max_zoom: Option<u8>,

	/// directory for the z/x/y tile tree [default: shom_tiles_complete]
	#[arg(long, short, value_name = "DIR")]
	output: Option<PathBuf>,

	/// tile URL with {z}, {x} and {y} placeholders [default: SHOM marine charts WMTS]
	#[arg(long, value_name = "TEMPLATE", env = "TILEPACK_URL")]
	url: Option<String>,

	/// image format the service delivers: png, jpg or webp [default: png]
	#[arg(long)]
	format: Option<TileFormat>,

	/// parallel requests [default: number of CPUs times 3, at most 8]
	#[arg(long, short, value_name = "INT", env = "TILEPACK_CONCURRENCY")]
	concurrency: Option<usize>,

	/// request timeout in seconds [default: 30]
	#[arg(long, value_name = "SECONDS")]
	timeout: Option<u64>,

	/// retries for failed requests [default: 3]
	#[arg(long, value_name = "INT")]
	retries: Option<u32>,

	/// check existing tiles and download broken ones again
	#[arg(long)]
	verify_existing: bool,
}

impl Subcommand {
	/// Built-in defaults, overridden by the config file, overridden by flags.
	fn build_config(&self, file: &Config) -> Result<DownloadConfig> {
		let mut config = DownloadConfig::default();
		file.download.apply_to(&mut config)?;

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
		if let Some(timeout) = self.timeout {
			config.timeout = Duration::from_secs(timeout);
		}
		if let Some(retries) = self.retries {
			config.max_retries = retries;
		}
		if self.verify_existing {
			config.verify_existing = true;
		}

		config.validate()?;
		Ok(config)
	}
}

#[tokio::main]
pub async fn run(arguments: &Subcommand, file: &Config) -> Result<()> {
	let config = arguments.build_config(file)?;
	eprintln!(
		"download {} at zoom {}..{} into {:?}",
		config.bbox, config.min_zoom, config.max_zoom, config.output_dir
	);

	let orchestrator = DownloadOrchestrator::new(&config)?;
	let report = orchestrator.run(&config.bbox, config.min_zoom, config.max_zoom).await?;

	println!("{report}");
	println!("success rate: {:.1}%", report.total().success_rate());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tests::parse_command;
	use crate::{Cli, Commands};

	fn build(args: &[&str], file: &Config) -> Result<DownloadConfig> {
		let mut argv = vec!["tilepack", "download"];
		argv.extend_from_slice(args);
		let Cli {
			command: Commands::Download(subcommand),
			..
		} = parse_command(argv)?
		else {
			unreachable!("parsed a different subcommand");
		};
		subcommand.build_config(file)
	}

	#[test]
	fn defaults() -> Result<()> {
		assert_eq!(build(&[], &Config::default())?, DownloadConfig::default());
		Ok(())
	}

	#[test]
	fn flags_override_config_file() -> Result<()> {
		let file = Config::from_string("download:\n  min_zoom: 9\n  max_zoom: 11\n  concurrency: 2\n")?;
		let config = build(
			&[
				"--bbox",
				"-4.8,48.2,-4.3,48.5",
				"--max-zoom",
				"12",
				"--timeout",
				"5",
				"--verify-existing",
			],
			&file,
		)?;

		assert_eq!(config.bbox, GeoBBox::new(-4.8, 48.2, -4.3, 48.5)?);
		assert_eq!((config.min_zoom, config.max_zoom), (9, 12));
		assert_eq!(config.concurrency, 2);
		assert_eq!(config.timeout, Duration::from_secs(5));
		assert!(config.verify_existing);
		Ok(())
	}

	#[test]
	fn invalid_arguments() {
		assert!(build(&["--bbox", "2,47,-5,50"], &Config::default()).is_err());
		assert!(build(&["--min-zoom", "12", "--max-zoom", "10"], &Config::default()).is_err());
		assert!(build(&["--url", "https://example.org/tiles"], &Config::default()).is_err());
		assert!(build(&["--format", "gif"], &Config::default()).is_err());
	}
}
