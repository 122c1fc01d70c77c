//! Core types shared by tile acquisition and tile packaging.
//!
//! - [`geo_grid`]: Web Mercator conversions between coordinates and tile indices
//! - [`TileCoord`], [`TileRange`], [`GeoBBox`]: tiles, tile rectangles and geographic extents
//! - [`TilePlan`]: the tile set needed for a bounding box and zoom range
//! - [`TileFormat`]: raster formats and signature sniffing
//! - [`progress`]: terminal progress bar

mod concurrency;
pub use concurrency::ConcurrencyLimits;

pub mod progress;

pub mod types;
pub use types::*;
