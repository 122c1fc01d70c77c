//! Read back an MBTiles archive: metadata, per-zoom counts and single tiles.
//!
//! Tiles are looked up by XYZ coordinates; the TMS row stored in the archive
//! is flipped on the way in.

use anyhow::{Context, Result, ensure};
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, OptionalExtension, params},
};
use std::{collections::BTreeMap, path::Path};
use tilepack_core::{Blob, TileCoord};

pub struct MBTilesReader {
	name: String,
	pool: Pool<SqliteConnectionManager>,
}

impl MBTilesReader {
	/// Opens an existing archive read-only.
	pub fn open(path: &Path) -> Result<MBTilesReader> {
		log::debug!("open {path:?}");
		ensure!(path.is_file(), "file {path:?} does not exist");

		let manager = SqliteConnectionManager::file(path).with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY);
		let pool = Pool::builder()
			.max_size(1)
			.build(manager)
			.with_context(|| format!("opening MBTiles at {path:?}"))?;

		Ok(MBTilesReader {
			name: path.to_string_lossy().into_owned(),
			pool,
		})
	}

	pub fn metadata(&self) -> Result<BTreeMap<String, String>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT name, value FROM metadata")?;
		let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

		let mut metadata = BTreeMap::new();
		for row in rows {
			let (name, value) = row?;
			metadata.insert(name, value);
		}
		Ok(metadata)
	}

	/// Number of tiles per zoom level.
	pub fn tile_counts(&self) -> Result<BTreeMap<u8, u64>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT zoom_level, COUNT(*) FROM tiles GROUP BY zoom_level")?;
		let rows = stmt.query_map([], |row| Ok((row.get::<_, u8>(0)?, row.get::<_, i64>(1)?)))?;

		let mut counts = BTreeMap::new();
		for row in rows {
			let (level, count) = row?;
			counts.insert(level, count as u64);
		}
		Ok(counts)
	}

	pub fn tile_count(&self) -> Result<u64> {
		Ok(self.tile_counts()?.values().sum())
	}

	pub fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		let conn = self.pool.get()?;
		let data = conn
			.query_row(
				"SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
				params![coord.level, coord.x, coord.tms_y()],
				|row| row.get::<_, Vec<u8>>(0),
			)
			.optional()
			.with_context(|| format!("reading tile {coord} from {}", self.name))?;
		Ok(data.map(Blob::from))
	}

	/// `(zoom_level, tile_column, tile_row)` as stored, without flipping.
	pub fn raw_tile_rows(&self) -> Result<Vec<(u8, u32, u32)>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT zoom_level, tile_column, tile_row FROM tiles ORDER BY 1, 2, 3")?;
		let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
		Ok(rows.collect::<Result<Vec<_>, _>>()?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MBTilesWriter;
	use assert_fs::NamedTempFile;

	#[test]
	fn missing_file() {
		let file = NamedTempFile::new("missing.mbtiles").unwrap();
		let err = MBTilesReader::open(file.path()).err().unwrap();
		assert!(err.to_string().ends_with("missing.mbtiles\" does not exist"));
	}

	#[test]
	fn counts_and_lookup() -> Result<()> {
		let file = NamedTempFile::new("counts.mbtiles")?;
		let writer = MBTilesWriter::create(file.path(), false)?;
		writer.add_tiles(&[
			(TileCoord::new(1, 0, 0)?, Blob::from("north-west")),
			(TileCoord::new(1, 0, 1)?, Blob::from("south-west")),
			(TileCoord::new(2, 3, 3)?, Blob::from("far south-east")),
		])?;
		drop(writer);

		let reader = MBTilesReader::open(file.path())?;
		assert_eq!(reader.tile_counts()?, BTreeMap::from([(1, 2), (2, 1)]));
		assert_eq!(reader.tile_count()?, 3);
		assert_eq!(reader.raw_tile_rows()?, [(1, 0, 0), (1, 0, 1), (2, 3, 0)]);

		assert_eq!(reader.get_tile(&TileCoord::new(1, 0, 0)?)?, Some(Blob::from("north-west")));
		assert_eq!(reader.get_tile(&TileCoord::new(1, 0, 1)?)?, Some(Blob::from("south-west")));
		assert_eq!(reader.get_tile(&TileCoord::new(1, 1, 1)?)?, None);
		assert!(reader.metadata()?.is_empty());
		Ok(())
	}
}
