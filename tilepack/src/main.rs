mod config;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use config::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// YAML file with `download` and `package` settings
	#[arg(long, global = true, value_name = "FILE", env = "TILEPACK_CONFIG")]
	config: Option<PathBuf>,

	#[command(flatten)]
	verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Download the tiles of an area into a z/x/y directory tree
	Download(tools::download::Subcommand),

	/// Package a z/x/y directory tree into an MBTiles file
	Package(tools::package::Subcommand),

	/// Show metadata and tile counts of an MBTiles file
	Probe(tools::probe::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	let config = match &cli.config {
		Some(path) => Config::from_path(path)?,
		None => Config::default(),
	};

	match &cli.command {
		Commands::Download(arguments) => tools::download::run(arguments, &config),
		Commands::Package(arguments) => tools::package::run(arguments, &config),
		Commands::Probe(arguments) => tools::probe::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	pub fn parse_command(arg_vec: Vec<&str>) -> Result<Cli> {
		Ok(Cli::try_parse_from(arg_vec)?)
	}

	pub fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = parse_command(arg_vec)?;
		let msg = format!("{cli:?}");
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["tilepack"]).unwrap_err().to_string();
		assert!(err.contains("Usage: tilepack [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["tilepack", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("tilepack "));
	}

	#[test]
	fn probe_subcommand() {
		let err = run_command(vec!["tilepack", "probe"]).unwrap_err().to_string();
		assert!(err.starts_with("Show metadata and tile counts of an MBTiles file"));
	}

	#[test]
	fn missing_config_file() {
		let err = run_command(vec!["tilepack", "--config", "does_not_exist.yml", "probe", "x.mbtiles"]).unwrap_err();
		assert!(err.to_string().starts_with("opening config file"));
	}
}
