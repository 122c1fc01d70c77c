mod blob;
pub use blob::*;

mod geo_bbox;
pub use geo_bbox::*;

pub mod geo_grid;
pub use geo_grid::{MAX_MERCATOR_LAT, lat_lon_to_tile, tile_to_lat_lon, tms_row};

pub mod tile_coord;
pub use tile_coord::TileCoord;

mod tile_format;
pub use tile_format::*;

mod tile_plan;
pub use tile_plan::*;

mod tile_range;
pub use tile_range::*;
