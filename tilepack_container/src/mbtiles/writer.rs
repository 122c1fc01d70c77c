//! Write a scanned tile tree into an MBTiles (SQLite) archive.
//!
//! The archive follows the [MBTiles 1.3 specification](https://github.com/mapbox/mbtiles-spec):
//! - `tiles (zoom_level, tile_column, tile_row, tile_data)`, unique on the coordinates
//! - `metadata (name, value)`, unique on the name
//!
//! Rows are stored in **TMS order**: the XYZ row of the tile tree is flipped
//! (`tile_row = 2^z - 1 - y`) before insertion.
//!
//! ## Example
//! ```rust,no_run
//! use tilepack_container::*;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = PackageConfig::default();
//!     let scan = DirectoryScanner::new(config.tile_format).scan(&config.input_dir)?;
//!     let stats = MBTilesWriter::write(&scan, &config)?;
//!     println!("inserted {}/{} tiles", stats.inserted, stats.total);
//!     Ok(())
//! }
//! ```

use crate::{PackageConfig, ScanResult};
use anyhow::{Context, Result, bail, ensure};
use r2d2::Pool;
use r2d2_sqlite::{SqliteConnectionManager, rusqlite::params};
use std::{
	fmt::{self, Display},
	fs,
	path::{Path, PathBuf},
};
use tilepack_core::{Blob, GeoBBox, TileCoord, progress::get_progress_bar};

/// Tile counts of a packaging run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackageStats {
	/// Tiles found by the scan.
	pub total: u64,
	pub inserted: u64,
	/// Files below the minimum tile size.
	pub skipped: u64,
	/// Files that could not be read or inserted.
	pub failed: u64,
}

impl PackageStats {
	pub fn processed(&self) -> u64 {
		self.inserted + self.skipped + self.failed
	}
}

impl Display for PackageStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"inserted {}/{} tiles ({} skipped, {} failed)",
			self.inserted, self.total, self.skipped, self.failed
		)
	}
}

/// The metadata rows of an archive, derived from a scan.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchiveMetadata {
	pub name: String,
	pub description: String,
	pub attribution: String,
	pub format: String,
	pub bounds: GeoBBox,
	pub min_zoom: u8,
	pub max_zoom: u8,
}

impl ArchiveMetadata {
	pub fn from_scan(scan: &ScanResult, config: &PackageConfig) -> Result<ArchiveMetadata> {
		let (Some(bounds), Some(min_zoom), Some(max_zoom)) = (scan.bbox(), scan.min_zoom(), scan.max_zoom()) else {
			bail!("no tiles found");
		};

		let description = config.description.clone().unwrap_or_else(|| {
			format!(
				"{} covering {:.2}°-{:.2}°N, {:.2}°-{:.2}°E",
				config.name, bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
			)
		});

		Ok(ArchiveMetadata {
			name: config.name.clone(),
			description,
			attribution: config.attribution.clone(),
			format: scan.format().as_str().to_string(),
			bounds,
			min_zoom,
			max_zoom,
		})
	}

	/// Zoom level a viewer should open at.
	pub fn center_zoom(&self) -> u8 {
		self.min_zoom.saturating_add(2).min(self.max_zoom)
	}

	pub fn to_rows(&self) -> Vec<(&'static str, String)> {
		let (lon, lat) = self.bounds.center();
		vec![
			("name", self.name.clone()),
			("type", "overlay".to_string()),
			("version", "1.0".to_string()),
			("description", self.description.clone()),
			("attribution", self.attribution.clone()),
			("format", self.format.clone()),
			("bounds", self.bounds.to_string()),
			("center", format!("{lon},{lat},{}", self.center_zoom())),
			("minzoom", self.min_zoom.to_string()),
			("maxzoom", self.max_zoom.to_string()),
		]
	}
}

/// Writer for MBTiles archives. Holds a single SQLite connection that is
/// closed when the writer is dropped.
pub struct MBTilesWriter {
	pool: Pool<SqliteConnectionManager>,
	path: PathBuf,
}

impl MBTilesWriter {
	/// Creates a new archive with an empty schema.
	///
	/// An existing non-empty file is an error unless `overwrite` is set; an
	/// existing empty file is replaced.
	pub fn create(path: &Path, overwrite: bool) -> Result<MBTilesWriter> {
		if path.exists() {
			let len = fs::metadata(path)?.len();
			ensure!(
				overwrite || len == 0,
				"output file {path:?} already exists ({len} bytes), remove it first"
			);
			log::debug!("replacing existing {path:?}");
			fs::remove_file(path).with_context(|| format!("removing existing {path:?}"))?;
		}

		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder()
			.max_size(1)
			.build(manager)
			.with_context(|| format!("opening {path:?} for writing"))?;

		pool.get()?.execute_batch(
			"CREATE TABLE metadata (name TEXT, value TEXT, UNIQUE (name));
			CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB, UNIQUE (zoom_level, tile_column, tile_row));
			CREATE UNIQUE INDEX tile_index on tiles (zoom_level, tile_column, tile_row);",
		)?;

		Ok(MBTilesWriter {
			pool,
			path: path.to_path_buf(),
		})
	}

	/// Packages every tile of `scan` into `config.output` and writes the metadata.
	///
	/// Unreadable files and rejected rows are counted as failed and do not stop
	/// the run. An empty scan, an existing output or a database fault are errors.
	pub fn write(scan: &ScanResult, config: &PackageConfig) -> Result<PackageStats> {
		config.validate()?;
		let metadata = ArchiveMetadata::from_scan(scan, config)?;
		let writer = MBTilesWriter::create(&config.output, config.overwrite)?;

		let mut stats = PackageStats {
			total: scan.tile_count(),
			..Default::default()
		};
		log::info!("packaging {} tiles into {:?}", stats.total, config.output);

		let progress = get_progress_bar("packaging", stats.total);
		for chunk in scan.tiles().chunks(config.batch_size) {
			let mut batch = Vec::with_capacity(chunk.len());
			for tile in chunk {
				match fs::read(&tile.path) {
					Ok(data) if (data.len() as u64) < config.min_tile_size => {
						log::warn!("skipping {:?}: only {} bytes", tile.path, data.len());
						stats.skipped += 1;
					}
					Ok(data) => batch.push((tile.coord, Blob::from(data))),
					Err(err) => {
						log::warn!("failed to read {:?}: {err}", tile.path);
						stats.failed += 1;
					}
				}
			}

			let inserted = writer.add_tiles(&batch)?;
			stats.inserted += inserted;
			stats.failed += batch.len() as u64 - inserted;

			progress.set_position(stats.processed());
			log::info!("inserted {}/{} tiles", stats.inserted, stats.total);
		}
		progress.finish();

		writer.set_metadata(&metadata)?;
		log::info!("{stats}");
		Ok(stats)
	}

	/// Inserts `tiles` in one transaction and returns the number of rows written.
	///
	/// A rejected row, such as a duplicate coordinate, is logged and left out.
	pub fn add_tiles(&self, tiles: &[(TileCoord, Blob)]) -> Result<u64> {
		let mut conn = self.pool.get()?;
		let transaction = conn.transaction()?;
		let mut inserted = 0;
		for (coord, blob) in tiles {
			let result = transaction.execute(
				"INSERT INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
				params![coord.level, coord.x, coord.tms_y(), blob.as_slice()],
			);
			match result {
				Ok(_) => inserted += 1,
				Err(err) => log::warn!("failed to insert tile {coord}: {err}"),
			}
		}
		transaction
			.commit()
			.with_context(|| format!("committing {} tiles to {:?}", tiles.len(), self.path))?;
		Ok(inserted)
	}

	pub fn set_metadata(&self, metadata: &ArchiveMetadata) -> Result<()> {
		let mut conn = self.pool.get()?;
		let transaction = conn.transaction()?;
		for (name, value) in metadata.to_rows() {
			transaction
				.execute(
					"INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)",
					params![name, value],
				)
				.with_context(|| format!("setting metadata '{name}' = '{value}'"))?;
		}
		transaction.commit()?;
		Ok(())
	}
}
