//! Rectangular ranges of tiles at a single zoom level.
//!
//! A `TileRange` stores inclusive minimum and maximum column/row indices. It is
//! used in two directions:
//! - planning: [`TileRange::from_geo`] covers a [`GeoBBox`] with tiles,
//! - scanning: [`TileRange::include`] grows a range around tiles found on disk,
//!   and [`TileRange::to_geo_bbox`] turns it back into geographic bounds.
//!
//! ```
//! use tilepack_core::{GeoBBox, TileRange};
//!
//! let bbox = GeoBBox::new(-5.0, 47.0, 2.0, 50.0).unwrap();
//! let range = TileRange::from_geo(8, &bbox).unwrap();
//! assert_eq!((range.x_min(), range.x_max(), range.y_min(), range.y_max()), (124, 129, 86, 90));
//! assert_eq!(range.count_tiles(), 30);
//! ```

use crate::{GeoBBox, TileCoord, geo_grid};
use anyhow::{Result, ensure};
use std::fmt::{self, Debug, Display};

/// The tiles `x_min..=x_max` × `y_min..=y_max` at zoom `level` (XYZ rows).
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct TileRange {
	/// Zoom level of the range.
	pub level: u8,
	x_min: u32,
	y_min: u32,
	x_max: u32,
	y_max: u32,
}

impl TileRange {
	/// Creates a range from inclusive minimum and maximum indices.
	///
	/// # Errors
	/// Returns an error if a minimum exceeds its maximum or an index is outside the level's grid.
	pub fn from_min_and_max(level: u8, x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Result<TileRange> {
		// validates level and grid bounds
		TileCoord::new(level, x_max, y_max)?;
		ensure!(x_min <= x_max, "x_min ({x_min}) must be <= x_max ({x_max})");
		ensure!(y_min <= y_max, "y_min ({y_min}) must be <= y_max ({y_max})");
		Ok(TileRange {
			level,
			x_min,
			y_min,
			x_max,
			y_max,
		})
	}

	/// A range containing exactly one tile.
	pub fn from_coord(coord: &TileCoord) -> TileRange {
		TileRange {
			level: coord.level,
			x_min: coord.x,
			y_min: coord.y,
			x_max: coord.x,
			y_max: coord.y,
		}
	}

	/// Covers `bbox` with tiles at `level`.
	///
	/// The west/east longitudes give the columns, the north latitude gives the
	/// smaller row and the south latitude the larger one. Corners outside the
	/// Web Mercator grid are clamped, so a degenerate box still yields a
	/// minimal range of one tile rather than an error.
	pub fn from_geo(level: u8, bbox: &GeoBBox) -> Result<TileRange> {
		let north_west = TileCoord::from_lat_lon(bbox.max_lat, bbox.min_lon, level)?;
		let south_east = TileCoord::from_lat_lon(bbox.min_lat, bbox.max_lon, level)?;
		TileRange::from_min_and_max(
			level,
			north_west.x.min(south_east.x),
			north_west.y.min(south_east.y),
			north_west.x.max(south_east.x),
			north_west.y.max(south_east.y),
		)
	}

	pub fn x_min(&self) -> u32 {
		self.x_min
	}

	pub fn y_min(&self) -> u32 {
		self.y_min
	}

	pub fn x_max(&self) -> u32 {
		self.x_max
	}

	pub fn y_max(&self) -> u32 {
		self.y_max
	}

	pub fn width(&self) -> u32 {
		self.x_max - self.x_min + 1
	}

	pub fn height(&self) -> u32 {
		self.y_max - self.y_min + 1
	}

	/// Number of tiles in the range, `width * height`.
	pub fn count_tiles(&self) -> u64 {
		u64::from(self.width()) * u64::from(self.height())
	}

	pub fn contains(&self, coord: &TileCoord) -> bool {
		coord.level == self.level
			&& (self.x_min..=self.x_max).contains(&coord.x)
			&& (self.y_min..=self.y_max).contains(&coord.y)
	}

	/// Grows the range to include `coord`.
	///
	/// # Errors
	/// Returns an error if `coord` is on a different zoom level.
	pub fn include(&mut self, coord: &TileCoord) -> Result<()> {
		ensure!(
			coord.level == self.level,
			"cannot include {coord} in a range at level {}",
			self.level
		);
		self.x_min = self.x_min.min(coord.x);
		self.y_min = self.y_min.min(coord.y);
		self.x_max = self.x_max.max(coord.x);
		self.y_max = self.y_max.max(coord.y);
		Ok(())
	}

	/// Iterates over all tiles, column by column, each column north to south.
	pub fn iter_coords(&self) -> impl Iterator<Item = TileCoord> + use<> {
		let level = self.level;
		let (y_min, y_max) = (self.y_min, self.y_max);
		(self.x_min..=self.x_max).flat_map(move |x| (y_min..=y_max).map(move |y| TileCoord { level, x, y }))
	}

	/// Geographic extent of the range.
	///
	/// The north-west corner is the corner of `(x_min, y_min)`, the south-east
	/// corner is the north-west corner of the exclusive far tile `(x_max + 1, y_max + 1)`.
	pub fn to_geo_bbox(&self) -> GeoBBox {
		let (north, west) = geo_grid::tile_to_lat_lon(self.x_min, self.y_min, self.level);
		let (south, east) = geo_grid::tile_to_lat_lon(self.x_max + 1, self.y_max + 1, self.level);
		GeoBBox::from_edges(west, south, east, north)
	}
}

impl Debug for TileRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}: [{},{},{},{}] ({}x{})",
			self.level,
			self.x_min,
			self.y_min,
			self.x_max,
			self.y_max,
			self.width(),
			self.height()
		)
	}
}

impl Display for TileRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "X({}-{}) Y({}-{})", self.x_min, self.x_max, self.y_min, self.y_max)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use rstest::rstest;

	#[rstest]
	#[case((4, 5, 12, 5, 12), 1)]
	#[case((4, 5, 12, 7, 15), 12)]
	#[case((8, 124, 86, 129, 90), 30)]
	#[case((8, 122, 85, 135, 95), 154)]
	fn count_tiles_cases(#[case] args: (u8, u32, u32, u32, u32), #[case] expected: u64) {
		let (l, x0, y0, x1, y1) = args;
		assert_eq!(
			TileRange::from_min_and_max(l, x0, y0, x1, y1).unwrap().count_tiles(),
			expected
		);
	}

	#[test]
	fn from_min_and_max_validates() {
		assert!(TileRange::from_min_and_max(4, 6, 0, 5, 0).is_err());
		assert!(TileRange::from_min_and_max(4, 0, 6, 0, 5).is_err());
		assert!(TileRange::from_min_and_max(4, 0, 0, 16, 0).is_err());
	}

	#[rstest]
	#[case(8, (124, 129, 86, 90))]
	#[case(9, (248, 258, 173, 180))]
	#[case(10, (497, 517, 347, 360))]
	fn from_geo_brittany(#[case] level: u8, #[case] expected: (u32, u32, u32, u32)) -> Result<()> {
		let range = TileRange::from_geo(level, &GeoBBox::new(-5.0, 47.0, 2.0, 50.0)?)?;
		assert_eq!(
			(range.x_min(), range.x_max(), range.y_min(), range.y_max()),
			expected
		);
		Ok(())
	}

	#[test]
	fn degenerate_box_yields_one_tile() -> Result<()> {
		let range = TileRange::from_geo(0, &GeoBBox::new(8.0, 51.0, 8.000_001, 51.000_001)?)?;
		assert_eq!(range.count_tiles(), 1);

		let range = TileRange::from_geo(14, &GeoBBox::new(-132.000_001, -40.0, -132.0, -39.999_999)?)?;
		assert_eq!(range.count_tiles(), 1);
		Ok(())
	}

	#[test]
	fn polar_box_is_clamped_to_grid() -> Result<()> {
		let range = TileRange::from_geo(2, &GeoBBox::new(-180.0, -90.0, 180.0, 90.0)?)?;
		assert_eq!(range.count_tiles(), 16);
		Ok(())
	}

	#[test]
	fn include_grows_range() -> Result<()> {
		let mut range = TileRange::from_coord(&TileCoord::new(8, 130, 90)?);
		range.include(&TileCoord::new(8, 122, 95)?)?;
		range.include(&TileCoord::new(8, 135, 85)?)?;
		assert_eq!(range, TileRange::from_min_and_max(8, 122, 85, 135, 95)?);
		assert!(range.include(&TileCoord::new(9, 0, 0)?).is_err());
		Ok(())
	}

	#[test]
	fn iter_coords_column_major() -> Result<()> {
		let range = TileRange::from_min_and_max(3, 1, 2, 2, 3)?;
		let coords: Vec<String> = range.iter_coords().map(|c| c.to_string()).collect();
		assert_eq!(coords, ["3/1/2", "3/1/3", "3/2/2", "3/2/3"]);
		assert!(range.iter_coords().all(|c| range.contains(&c)));
		Ok(())
	}

	#[test]
	fn to_geo_bbox_uses_exclusive_far_corner() -> Result<()> {
		let range = TileRange::from_min_and_max(8, 122, 85, 135, 95)?;
		let bbox = range.to_geo_bbox();
		let (north, west) = geo_grid::tile_to_lat_lon(122, 85, 8);
		let (south, east) = geo_grid::tile_to_lat_lon(136, 96, 8);
		assert_relative_eq!(bbox.min_lon, west);
		assert_relative_eq!(bbox.max_lon, east);
		assert_relative_eq!(bbox.max_lat, north);
		assert_relative_eq!(bbox.min_lat, south);
		assert_relative_eq!(bbox.min_lon, -8.4375);
		assert_relative_eq!(bbox.max_lon, 11.25);
		Ok(())
	}

	#[test]
	fn quarter_planet() -> Result<()> {
		let geo_bbox = GeoBBox::new(0.0, -crate::MAX_MERCATOR_LAT, 180.0, 0.0)?;
		for level in 1..20 {
			let range = TileRange::from_geo(level, &geo_bbox)?;
			// east edge on the antimeridian is clamped, equator lands on the first southern row
			assert_eq!(range.x_min(), 1 << (level - 1));
			assert_eq!(range.y_min(), 1 << (level - 1));
		}
		Ok(())
	}

	#[test]
	fn formatting() -> Result<()> {
		let range = TileRange::from_min_and_max(8, 124, 86, 129, 90)?;
		assert_eq!(format!("{range:?}"), "8: [124,86,129,90] (6x5)");
		assert_eq!(range.to_string(), "X(124-129) Y(86-90)");
		Ok(())
	}
}
