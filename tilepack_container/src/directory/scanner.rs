//! Discovers the tiles present in a `<root>/<z>/<x>/<y>.<ext>` tree.
//!
//! Only what exists on disk counts: a zoom level whose directories hold no
//! matching tiles is left out, and the per-level ranges are the extremes of
//! the tiles found, not of the area that was originally requested.
//!
//! Entries that do not fit the layout are ignored:
//! | Path                     | Reason                      |
//! |--------------------------|-----------------------------|
//! | `/tiles/README.md`       | not a zoom directory        |
//! | `/tiles/8/tmp/1.png`     | column is not numeric       |
//! | `/tiles/8/124/86.jpg`    | extension of another format |
//! | `/tiles/8/124/.tmpA1b2`  | leftover temporary file     |
//! | `/tiles/8/999/86.png`    | outside the zoom 8 grid     |
//!
//! ```no_run
//! use tilepack_container::DirectoryScanner;
//! use tilepack_core::TileFormat;
//! use std::path::Path;
//!
//! let scan = DirectoryScanner::new(TileFormat::PNG).scan(Path::new("shom_tiles_complete")).unwrap();
//! for (level, summary) in scan.levels() {
//!     println!("zoom {level}: {} tiles, {}", summary.count, summary.range);
//! }
//! ```

use anyhow::{Context, Result};
use itertools::Itertools;
use std::{
	collections::BTreeMap,
	fs, io,
	path::{Path, PathBuf},
};
use tilepack_core::{GeoBBox, TileCoord, TileFormat, TileRange};

/// Extent and number of the tiles found on one zoom level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSummary {
	pub range: TileRange,
	pub count: u64,
}

/// One tile file of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileEntry {
	pub coord: TileCoord,
	pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScanResult {
	format: TileFormat,
	levels: BTreeMap<u8, LevelSummary>,
	tiles: Vec<TileEntry>,
}

impl ScanResult {
	pub fn format(&self) -> TileFormat {
		self.format
	}

	pub fn levels(&self) -> &BTreeMap<u8, LevelSummary> {
		&self.levels
	}

	/// All tiles, sorted by zoom, column and row.
	pub fn tiles(&self) -> &[TileEntry] {
		&self.tiles
	}

	pub fn tile_count(&self) -> u64 {
		self.tiles.len() as u64
	}

	pub fn is_empty(&self) -> bool {
		self.tiles.is_empty()
	}

	pub fn min_zoom(&self) -> Option<u8> {
		self.levels.keys().next().copied()
	}

	pub fn max_zoom(&self) -> Option<u8> {
		self.levels.keys().next_back().copied()
	}

	/// Geographic extent of the highest zoom level present, using the far
	/// edges of its last column and row.
	pub fn bbox(&self) -> Option<GeoBBox> {
		let (_, summary) = self.levels.iter().next_back()?;
		Some(summary.range.to_geo_bbox())
	}
}

/// Walks tile trees for tiles of a single format.
#[derive(Clone, Copy, Debug)]
pub struct DirectoryScanner {
	format: TileFormat,
}

impl DirectoryScanner {
	pub fn new(format: TileFormat) -> DirectoryScanner {
		DirectoryScanner { format }
	}

	/// Scans `root`. A missing root yields an [`io::Error`] of kind `NotFound`
	/// in the error chain; an empty tree is not an error.
	pub fn scan(&self, root: &Path) -> Result<ScanResult> {
		log::debug!("scanning {root:?} for {} tiles", self.format);

		if !root.is_dir() {
			let kind = if root.exists() {
				io::ErrorKind::NotADirectory
			} else {
				io::ErrorKind::NotFound
			};
			return Err(io::Error::new(kind, format!("tile directory {root:?} not found"))).context("scanning tile tree");
		}

		let mut tiles = Vec::new();
		for (level, level_dir) in numeric_dirs::<u8>(root)? {
			for (x, column_dir) in numeric_dirs::<u32>(&level_dir)? {
				for entry in fs::read_dir(&column_dir).with_context(|| format!("reading {column_dir:?}"))? {
					let entry = entry?;
					if !entry.path().is_file() {
						continue;
					}
					let Ok(mut name) = entry.file_name().into_string() else {
						continue;
					};
					if TileFormat::from_filename(&mut name) != Some(self.format) {
						continue;
					}
					let Ok(y) = name.parse::<u32>() else {
						continue;
					};
					match TileCoord::new(level, x, y) {
						Ok(coord) => tiles.push(TileEntry {
							coord,
							path: entry.path(),
						}),
						Err(err) => log::debug!("ignoring {:?}: {err}", entry.path()),
					}
				}
			}
		}
		tiles.sort_unstable_by_key(|tile| tile.coord);

		let mut levels: BTreeMap<u8, LevelSummary> = BTreeMap::new();
		for (level, group) in &tiles.iter().chunk_by(|tile| tile.coord.level) {
			let mut group = group.map(|tile| tile.coord);
			let Some(first) = group.next() else { continue };
			let mut summary = LevelSummary {
				range: TileRange::from_coord(&first),
				count: 1,
			};
			for coord in group {
				summary.range.include(&coord)?;
				summary.count += 1;
			}
			levels.insert(level, summary);
		}

		log::debug!("found {} tiles on {} zoom levels", tiles.len(), levels.len());
		Ok(ScanResult {
			format: self.format,
			levels,
			tiles,
		})
	}
}

/// Subdirectories of `dir`, symlinks followed, whose names parse as `T`, sorted by value.
fn numeric_dirs<T: std::str::FromStr + Ord>(dir: &Path) -> Result<Vec<(T, PathBuf)>> {
	let mut dirs = Vec::new();
	for entry in fs::read_dir(dir).with_context(|| format!("reading {dir:?}"))? {
		let entry = entry?;
		if !entry.path().is_dir() {
			continue;
		}
		if let Some(value) = entry.file_name().to_str().and_then(|name| name.parse::<T>().ok()) {
			dirs.push((value, entry.path()));
		}
	}
	Ok(dirs.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)).collect())
}
