//! Three-dimensional tile coordinates in the XYZ tile pyramid
//!
//! [`TileCoord`] identifies one tile by zoom `level`, column `x` and row `y`.
//! Rows follow the XYZ scheme (row `0` is north). Use [`TileCoord::tms_y`] to
//! get the row in the TMS scheme used by MBTiles archives.
//!
//! # Examples
//!
//! ```
//! use tilepack_core::TileCoord;
//!
//! let coord = TileCoord::from_lat_lon(48.39, -4.49, 8).unwrap();
//! assert_eq!((coord.level, coord.x, coord.y), (8, 124, 88));
//! assert_eq!(coord.tms_y(), 167);
//! assert_eq!(coord.as_path_string("png"), "8/124/88.png");
//! ```

use crate::{GeoBBox, geo_grid};
use anyhow::{Result, ensure};
use std::fmt::{self, Debug, Display};

/// Maximum zoom level a tile coordinate can address.
pub const MAX_LEVEL: u8 = 31;

/// A tile in the XYZ pyramid.
///
/// Ordering is by level, then column, then row, which is the order tiles are
/// laid out in a `<z>/<x>/<y>` directory tree.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The column (x index) of the tile.
	pub x: u32,
	/// The row (y index) of the tile, XYZ scheme.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord` at zoom `level` with indices `x`, `y`.
	///
	/// # Errors
	/// Returns an error if `level` > 31 or `x`/`y` are outside `[0, 2^level)`.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
		let max = geo_grid::max_index(level);
		ensure!(x <= max, "x ({x}) out of bounds for level {level}");
		ensure!(y <= max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// Create the tile containing the geographic point `lat`, `lon` at `level`.
	///
	/// Points beyond the Web Mercator latitude limit or on the antimeridian are
	/// clamped onto the outermost tile row/column.
	///
	/// # Errors
	/// Returns an error for non-finite coordinates, `lat` outside `[-90, 90]`,
	/// `lon` outside `[-180, 180]` or `level` > 31.
	pub fn from_lat_lon(lat: f64, lon: f64, level: u8) -> Result<TileCoord> {
		ensure!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
		ensure!((-90.0..=90.0).contains(&lat), "latitude ({lat}) must be within [-90, 90]");
		ensure!((-180.0..=180.0).contains(&lon), "longitude ({lon}) must be within [-180, 180]");

		let (x, y) = geo_grid::lat_lon_to_tile(lat, lon, level);
		let max = i64::from(geo_grid::max_index(level));
		TileCoord::new(level, x.clamp(0, max) as u32, y.clamp(0, max) as u32)
	}

	/// Latitude/longitude of the tile's northwest corner, as `(lat, lon)`.
	pub fn northwest(&self) -> (f64, f64) {
		geo_grid::tile_to_lat_lon(self.x, self.y, self.level)
	}

	/// Geographic extent covered by this single tile.
	pub fn to_geo_bbox(&self) -> GeoBBox {
		let (north, west) = self.northwest();
		let (south, east) = geo_grid::tile_to_lat_lon(self.x + 1, self.y + 1, self.level);
		GeoBBox::from_edges(west, south, east, north)
	}

	/// Row of this tile in the TMS scheme (row `0` is south).
	pub fn tms_y(&self) -> u32 {
		geo_grid::tms_row(self.y, self.level)
	}

	/// Relative path of this tile in a `<z>/<x>/<y>.<ext>` tree.
	pub fn as_path_string(&self, extension: &str) -> String {
		format!("{}/{}/{}.{}", self.level, self.x, self.y, extension)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn new_validates_bounds() {
		assert!(TileCoord::new(3, 7, 7).is_ok());
		assert!(TileCoord::new(3, 8, 0).is_err());
		assert!(TileCoord::new(3, 0, 8).is_err());
		assert!(TileCoord::new(32, 0, 0).is_err());
		assert!(TileCoord::new(31, u32::MAX >> 1, 0).is_ok());
	}

	#[test]
	fn from_lat_lon_clamps_to_grid() -> Result<()> {
		assert_eq!(TileCoord::from_lat_lon(89.9, 180.0, 2)?, TileCoord::new(2, 3, 0)?);
		assert_eq!(TileCoord::from_lat_lon(-90.0, -180.0, 2)?, TileCoord::new(2, 0, 3)?);
		Ok(())
	}

	#[test]
	fn from_lat_lon_rejects_invalid_input() {
		assert!(TileCoord::from_lat_lon(91.0, 0.0, 2).is_err());
		assert!(TileCoord::from_lat_lon(0.0, -180.5, 2).is_err());
		assert!(TileCoord::from_lat_lon(f64::NAN, 0.0, 2).is_err());
		assert!(TileCoord::from_lat_lon(0.0, 0.0, 40).is_err());
	}

	#[test]
	fn northwest_corner_round_trip() -> Result<()> {
		let coord = TileCoord::from_lat_lon(48.39, -4.49, 12)?;
		let (lat, lon) = coord.northwest();
		assert_eq!(TileCoord::from_lat_lon(lat - 1e-9, lon + 1e-9, 12)?, coord);
		Ok(())
	}

	#[test]
	fn single_tile_bbox() -> Result<()> {
		let bbox = TileCoord::new(1, 1, 0)?.to_geo_bbox();
		assert_relative_eq!(bbox.min_lon, 0.0);
		assert_relative_eq!(bbox.max_lon, 180.0);
		assert_relative_eq!(bbox.min_lat, 0.0, epsilon = 1e-9);
		assert_relative_eq!(bbox.max_lat, crate::MAX_MERCATOR_LAT, epsilon = 1e-9);
		Ok(())
	}

	#[test]
	fn tms_row_of_coord() -> Result<()> {
		let coord = TileCoord::new(8, 124, 86)?;
		assert_eq!(coord.tms_y(), 169);
		assert_eq!(TileCoord::new(8, 124, coord.tms_y())?.tms_y(), 86);
		Ok(())
	}

	#[test]
	fn ordering_matches_tree_layout() -> Result<()> {
		let mut coords = vec![
			TileCoord::new(9, 0, 0)?,
			TileCoord::new(8, 125, 86)?,
			TileCoord::new(8, 124, 90)?,
			TileCoord::new(8, 124, 86)?,
		];
		coords.sort();
		assert_eq!(
			coords.iter().map(ToString::to_string).collect::<Vec<_>>(),
			["8/124/86", "8/124/90", "8/125/86", "9/0/0"]
		);
		Ok(())
	}

	#[test]
	fn formatting() -> Result<()> {
		let coord = TileCoord::new(8, 124, 86)?;
		assert_eq!(format!("{coord:?}"), "TileCoord(8, [124, 86])");
		assert_eq!(coord.as_path_string("png"), "8/124/86.png");
		Ok(())
	}
}
