//! Spherical Web Mercator tile math.
//!
//! These functions are the single source of truth for converting between
//! geographic coordinates and XYZ tile indices. The download side uses them to
//! plan which tiles to fetch, the packaging side uses them to turn the tiles
//! found on disk back into geographic bounds. Both sides must agree exactly,
//! so nothing else in the workspace re-implements this math.
//!
//! Conventions:
//! - Longitude maps linearly onto `[0, 2^zoom)`.
//! - Rows follow the XYZ scheme: row `0` is the northernmost row.
//! - `row = floor((1 - asinh(tan(lat)) / π) / 2 * 2^zoom)`, where
//!   `asinh(tan(lat)) == ln(tan(lat) + sec(lat))`.
//!
//! # Examples
//!
//! ```
//! use tilepack_core::{lat_lon_to_tile, tile_to_lat_lon, tms_row};
//!
//! assert_eq!(lat_lon_to_tile(50.0, -5.0, 8), (124, 86));
//!
//! let (lat, lon) = tile_to_lat_lon(124, 86, 8);
//! assert!(lat > 50.0 && lon < -5.0);
//!
//! assert_eq!(tms_row(0, 8), 255);
//! ```

use std::f64::consts::PI;

/// Northern and southern limit of the Web Mercator projection in degrees.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Converts a latitude/longitude pair in degrees to `(col, row)` at `zoom`.
///
/// The result is not clamped: latitudes beyond [`MAX_MERCATOR_LAT`] or
/// longitudes of exactly `180°` produce indices outside `[0, 2^zoom)`.
/// Callers clamp ([`TileCoord::from_lat_lon`](crate::TileCoord::from_lat_lon))
/// or reject such values.
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u8) -> (i64, i64) {
	let n = tiles_per_axis(zoom);
	let col = (lon + 180.0) / 360.0 * n;
	let row = (1.0 - lat.to_radians().tan().asinh() / PI) / 2.0 * n;
	(col.floor() as i64, row.floor() as i64)
}

/// Converts a tile index to the latitude/longitude of its northwest corner.
///
/// `col`/`row` may equal `2^zoom`, which yields the far (east/south) edge of
/// the grid. This is how the exclusive far corner of a tile range is computed.
pub fn tile_to_lat_lon(col: u32, row: u32, zoom: u8) -> (f64, f64) {
	let n = tiles_per_axis(zoom);
	let lon = f64::from(col) / n * 360.0 - 180.0;
	let lat = (PI * (1.0 - 2.0 * f64::from(row) / n)).sinh().atan().to_degrees();
	(lat, lon)
}

/// Flips a row between the XYZ and TMS numbering schemes.
///
/// `tms_row = (2^zoom - 1) - xyz_row`. The flip is its own inverse, so the same
/// function converts in both directions.
pub fn tms_row(row: u32, zoom: u8) -> u32 {
	max_index(zoom) - row
}

/// Largest valid column/row index at `zoom`.
pub fn max_index(zoom: u8) -> u32 {
	((1u64 << zoom) - 1) as u32
}

fn tiles_per_axis(zoom: u8) -> f64 {
	2.0f64.powi(i32::from(zoom))
}
