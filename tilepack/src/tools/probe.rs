use anyhow::Result;
use std::path::PathBuf;
use tilepack_container::MBTilesReader;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// MBTiles file to inspect
	#[arg(required = true)]
	filename: PathBuf,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	eprintln!("probe {:?}", arguments.filename);

	let reader = MBTilesReader::open(&arguments.filename)?;

	println!("metadata:");
	for (name, value) in reader.metadata()? {
		println!("  {name}: {value}");
	}

	let counts = reader.tile_counts()?;
	println!("tiles:");
	for (level, count) in &counts {
		println!("  zoom {level:>2}: {count:>8}");
	}
	println!("  total  : {:>8}", counts.values().sum::<u64>());
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;
	use assert_fs::NamedTempFile;
	use tilepack_container::MBTilesWriter;
	use tilepack_core::{Blob, TileCoord};

	#[test]
	fn probe_archive() -> anyhow::Result<()> {
		let file = NamedTempFile::new("probe.mbtiles")?;
		MBTilesWriter::create(file.path(), false)?.add_tiles(&[(TileCoord::new(2, 1, 1)?, Blob::from("tile"))])?;

		run_command(vec!["tilepack", "-q", "probe", file.path().to_str().unwrap()])?;
		Ok(())
	}

	#[test]
	fn probe_missing_file() {
		assert!(run_command(vec!["tilepack", "-q", "probe", "does_not_exist.mbtiles"]).is_err());
	}
}
