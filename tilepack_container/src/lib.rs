//! Scanning `z/x/y.ext` tile trees and packaging them into MBTiles archives.

mod config;
pub use config::*;

mod directory;
pub use directory::*;

mod mbtiles;
pub use mbtiles::*;
