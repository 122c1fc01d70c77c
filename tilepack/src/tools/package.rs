use crate::config::Config;
use anyhow::{Context, Result, ensure};
use std::{fs, path::PathBuf};
use tilepack_container::{DirectoryScanner, MBTilesWriter, PackageConfig};
use tilepack_core::TileFormat;

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true)]
pub struct Subcommand {
	/// directory with the z/x/y tile tree [default: shom_tiles_complete]
	#[arg(long, short, value_name = "DIR")]
	input: Option<PathBuf>,

	/// MBTiles file to create [default: shom_marine_charts.mbtiles]
	#[arg(long, short, value_name = "FILE")]
	output: Option<PathBuf>,

	/// replace the output file if it exists
	#[arg(long)]
	overwrite: bool,

	/// image format of the tiles: png, jpg or webp [default: png]
	#[arg(long)]
	format: Option<TileFormat>,

	/// name stored in the archive metadata
	#[arg(long)]
	name: Option<String>,

	/// attribution stored in the archive metadata, must name the data provider
	#[arg(long)]
	attribution: Option<String>,

	/// description stored in the archive metadata [default: generated from the bounds]
	#[arg(long)]
	description: Option<String>,
}

impl Subcommand {
	fn build_config(&self, file: &Config) -> PackageConfig {
		let mut config = PackageConfig::default();
		file.package.apply_to(&mut config);

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
		config.overwrite = self.overwrite;
		config
	}
}

pub fn run(arguments: &Subcommand, file: &Config) -> Result<()> {
	let config = arguments.build_config(file);
	eprintln!("package {:?} into {:?}", config.input_dir, config.output);

	let scan = DirectoryScanner::new(config.tile_format)
		.scan(&config.input_dir)
		.with_context(|| format!("cannot read tiles from {:?}", config.input_dir))?;
	ensure!(!scan.is_empty(), "no tiles found in {:?}", config.input_dir);

	println!("found {} zoom levels:", scan.levels().len());
	for (level, summary) in scan.levels() {
		println!("  zoom {level:>2}: {:>8} tiles, {}", summary.count, summary.range);
	}
	if let Some(bbox) = scan.bbox() {
		println!(
			"bounds: {:.4},{:.4} to {:.4},{:.4}",
			bbox.min_lat, bbox.min_lon, bbox.max_lat, bbox.max_lon
		);
	}

	let stats = MBTilesWriter::write(&scan, &config)?;
	let size = fs::metadata(&config.output)?.len();

	println!("file: {}", config.output.display());
	println!("tiles inserted: {}/{}", stats.inserted, stats.total);
	if stats.skipped + stats.failed > 0 {
		println!("skipped: {}, failed: {}", stats.skipped, stats.failed);
	}
	if let (Some(min_zoom), Some(max_zoom)) = (scan.min_zoom(), scan.max_zoom()) {
		println!("zoom levels: {min_zoom}-{max_zoom}");
	}
	println!("file size: {:.1} MB", size as f64 / 1024.0 / 1024.0);
	Ok(())
}
