use anyhow::Result;
use approx::assert_relative_eq;
use assert_fs::{TempDir, fixture::ChildPath, prelude::*};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use tilepack_container::{DirectoryScanner, MBTilesReader, MBTilesWriter, PackageConfig};
use tilepack_core::{Blob, GeoBBox, TileCoord, TileFormat, TilePlan};

fn png(seed: u32) -> Vec<u8> {
	let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
	data.extend_from_slice(&seed.to_be_bytes());
	data.resize(256, 0);
	data
}

/// Writes every tile of the plan below `root` and returns the number of files.
fn write_tree(root: &ChildPath, plan: &TilePlan) -> Result<u64> {
	let mut count = 0;
	for range in plan.iter() {
		for coord in range.iter_coords() {
			root.child(coord.as_path_string("png"))
				.write_binary(&png(coord.x * 1000 + coord.y))?;
			count += 1;
		}
	}
	Ok(count)
}

fn config(dir: &TempDir) -> PackageConfig {
	PackageConfig {
		input_dir: dir.path().join("tiles"),
		output: dir.path().join("charts.mbtiles"),
		..Default::default()
	}
}

fn package(config: &PackageConfig) -> Result<tilepack_container::PackageStats> {
	let scan = DirectoryScanner::new(TileFormat::PNG).scan(&config.input_dir)?;
	MBTilesWriter::write(&scan, config)
}

#[test]
fn packages_only_levels_present_on_disk() -> Result<()> {
	let dir = TempDir::new()?;
	let bbox = GeoBBox::new(-5.0, 47.0, 2.0, 50.0)?;
	let plan = TilePlan::new(&bbox, 8, 10)?;
	let n = write_tree(&dir.child("tiles"), &plan)?;
	// zoom 11 was requested but never downloaded
	dir.child("tiles/11").create_dir_all()?;

	let config = config(&dir);
	let stats = package(&config)?;

	assert_eq!(n, 412);
	assert_eq!((stats.total, stats.inserted, stats.skipped, stats.failed), (n, n, 0, 0));

	let reader = MBTilesReader::open(&config.output)?;
	assert_eq!(reader.tile_counts()?, BTreeMap::from([(8, 30), (9, 88), (10, 294)]));

	let metadata = reader.metadata()?;
	assert_eq!(metadata["minzoom"], "8");
	assert_eq!(metadata["maxzoom"], "10");
	assert_eq!(metadata["format"], "png");
	assert_eq!(metadata["type"], "overlay");
	assert!(metadata["attribution"].contains("SHOM"));
	for key in ["name", "version", "description", "bounds", "center"] {
		assert!(metadata.contains_key(key), "missing metadata '{key}'");
	}

	// bounds come from the zoom 10 tiles and enclose the requested area
	let bounds: GeoBBox = metadata["bounds"].parse()?;
	assert_eq!(bounds, plan.get(10).unwrap().to_geo_bbox());
	assert!(bounds.min_lon <= -5.0 && bounds.max_lon >= 2.0);
	assert!(bounds.min_lat <= 47.0 && bounds.max_lat >= 50.0);

	let center: Vec<f64> = metadata["center"].split(',').map(|v| v.parse().unwrap()).collect();
	assert_relative_eq!(center[0], (bounds.min_lon + bounds.max_lon) / 2.0);
	assert_relative_eq!(center[1], (bounds.min_lat + bounds.max_lat) / 2.0);
	assert_eq!(center[2], 10.0);

	// rows are stored flipped and read back at their XYZ position
	let coord = TileCoord::new(8, 124, 86)?;
	assert_eq!(reader.get_tile(&coord)?, Some(Blob::from(png(124_086))));
	let rows = reader.raw_tile_rows()?;
	assert!(rows.contains(&(8, 124, 169)));
	assert!(!rows.contains(&(8, 124, 86)));
	Ok(())
}

#[test]
fn small_and_stray_files_are_not_inserted() -> Result<()> {
	let dir = TempDir::new()?;
	let tiles = dir.child("tiles");
	tiles.child("8/124/86.png").write_binary(&png(1))?;
	tiles.child("8/124/87.png").write_binary(&png(2))?;
	tiles.child("8/125/86.png").write_str("tiny")?;
	tiles.child("8/125/87.jpg").write_binary(&png(3))?;
	tiles.child("8/125/notes.txt").write_str("downloaded by hand")?;

	let config = config(&dir);
	let stats = package(&config)?;

	assert_eq!((stats.total, stats.inserted, stats.skipped, stats.failed), (3, 2, 1, 0));
	assert_eq!(stats.to_string(), "inserted 2/3 tiles (1 skipped, 0 failed)");
	assert_eq!(MBTilesReader::open(&config.output)?.tile_count()?, 2);
	Ok(())
}

#[test]
fn existing_archive_is_kept_unless_overwritten() -> Result<()> {
	let dir = TempDir::new()?;
	dir.child("tiles/8/124/86.png").write_binary(&png(1))?;
	dir.child("charts.mbtiles").write_str("an older archive")?;

	let config = config(&dir);
	assert!(package(&config).is_err());
	assert_eq!(std::fs::read_to_string(&config.output)?, "an older archive");

	let stats = package(&PackageConfig {
		overwrite: true,
		..config.clone()
	})?;
	assert_eq!(stats.inserted, 1);
	assert_eq!(MBTilesReader::open(&config.output)?.tile_count()?, 1);
	Ok(())
}

#[test]
fn custom_metadata() -> Result<()> {
	let dir = TempDir::new()?;
	dir.child("tiles/5/15/11.png").write_binary(&png(1))?;

	let config = PackageConfig {
		name: "Brittany Coast".to_string(),
		attribution: "© SHOM".to_string(),
		description: Some("Charts for the summer cruise".to_string()),
		..config(&dir)
	};
	package(&config)?;

	let metadata = MBTilesReader::open(&config.output)?.metadata()?;
	assert_eq!(metadata["name"], "Brittany Coast");
	assert_eq!(metadata["attribution"], "© SHOM");
	assert_eq!(metadata["description"], "Charts for the summer cruise");
	assert_eq!(metadata["center"].rsplit(',').next(), Some("5"));
	Ok(())
}
