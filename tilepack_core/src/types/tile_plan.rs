//! Planning the tile set for a bounding box and zoom range.
//!
//! A [`TilePlan`] maps every zoom level of a request to the [`TileRange`]
//! covering the requested [`GeoBBox`]. The acquisition side iterates it level
//! by level; its per-level tile counts are the `expected` figures of the
//! download statistics.

use crate::{GeoBBox, TileRange, tile_coord::MAX_LEVEL};
use anyhow::{Result, ensure};
use std::collections::BTreeMap;

/// Tile ranges to acquire, keyed and ordered by zoom level.
#[derive(Clone, Debug, PartialEq)]
pub struct TilePlan {
	bbox: GeoBBox,
	ranges: BTreeMap<u8, TileRange>,
}

impl TilePlan {
	/// Plans the tiles covering `bbox` for every level in `min_zoom..=max_zoom`.
	///
	/// # Errors
	/// Returns an error if `min_zoom > max_zoom` or `max_zoom` exceeds 31.
	pub fn new(bbox: &GeoBBox, min_zoom: u8, max_zoom: u8) -> Result<TilePlan> {
		ensure!(
			min_zoom <= max_zoom,
			"min zoom ({min_zoom}) must be <= max zoom ({max_zoom})"
		);
		ensure!(max_zoom <= MAX_LEVEL, "max zoom ({max_zoom}) must be <= {MAX_LEVEL}");

		let ranges = (min_zoom..=max_zoom)
			.map(|level| Ok((level, TileRange::from_geo(level, bbox)?)))
			.collect::<Result<BTreeMap<_, _>>>()?;

		let plan = TilePlan { bbox: *bbox, ranges };
		log::debug!(
			"planned {} tiles over {} zoom levels for {bbox:?}",
			plan.count_tiles(),
			plan.ranges.len()
		);

		Ok(plan)
	}

	pub fn bbox(&self) -> &GeoBBox {
		&self.bbox
	}

	/// Range planned for `level`, if that level is part of the plan.
	pub fn get(&self, level: u8) -> Option<&TileRange> {
		self.ranges.get(&level)
	}

	/// Ranges in ascending zoom order.
	pub fn iter(&self) -> impl Iterator<Item = &TileRange> {
		self.ranges.values()
	}

	pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
		self.ranges.keys().copied()
	}

	/// Total number of tiles over all levels.
	pub fn count_tiles(&self) -> u64 {
		self.ranges.values().map(TileRange::count_tiles).sum()
	}
}

/// Shorthand for [`TilePlan::new`].
pub fn plan_tiles(bbox: &GeoBBox, min_zoom: u8, max_zoom: u8) -> Result<TilePlan> {
	TilePlan::new(bbox, min_zoom, max_zoom)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn brittany() -> GeoBBox {
		GeoBBox::new(-5.0, 47.0, 2.0, 50.0).unwrap()
	}

	#[test]
	fn single_level() -> Result<()> {
		let plan = plan_tiles(&brittany(), 8, 8)?;
		assert_eq!(plan.levels().collect::<Vec<_>>(), [8]);
		assert_eq!(plan.get(8), Some(&TileRange::from_min_and_max(8, 124, 86, 129, 90)?));
		assert_eq!(plan.count_tiles(), 30);
		assert!(plan.get(9).is_none());
		Ok(())
	}

	#[test]
	fn levels_are_ascending() -> Result<()> {
		let plan = plan_tiles(&brittany(), 8, 10)?;
		let counts: Vec<(u8, u64)> = plan.iter().map(|r| (r.level, r.count_tiles())).collect();
		assert_eq!(counts, [(8, 30), (9, 88), (10, 294)]);
		assert_eq!(plan.count_tiles(), 412);
		assert_eq!(plan.bbox(), &brittany());
		Ok(())
	}

	#[test]
	fn invalid_zoom_range() {
		assert!(plan_tiles(&brittany(), 9, 8).is_err());
		assert!(plan_tiles(&brittany(), 8, 32).is_err());
	}

	#[test]
	fn every_planned_tile_intersects_the_bbox() -> Result<()> {
		let bbox = brittany();
		let plan = plan_tiles(&bbox, 6, 9)?;
		for range in plan.iter() {
			for coord in range.iter_coords() {
				let tile = coord.to_geo_bbox();
				assert!(tile.min_lon <= bbox.max_lon && tile.max_lon >= bbox.min_lon, "{coord}");
				assert!(tile.min_lat <= bbox.max_lat && tile.max_lat >= bbox.min_lat, "{coord}");
			}
		}
		Ok(())
	}
}
