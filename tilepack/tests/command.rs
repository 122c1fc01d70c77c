use predicates::str;
use rstest::rstest;
use test_utilities::{BINARY_NAME, tilepack_cmd};

#[test]
fn command() {
	tilepack_cmd()
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} [OPTIONS] <COMMAND>")));
}

#[rstest]
#[case("probe", "[OPTIONS] <FILENAME>")]
fn subcommand(#[case] sub_command: &str, #[case] usage: &str) {
	tilepack_cmd()
		.args(sub_command.split(' '))
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} {sub_command} {usage}")));
}

#[rstest]
#[case("download", "Download the tiles of an area into a z/x/y directory tree")]
#[case("package", "Package a z/x/y directory tree into an MBTiles file")]
#[case("probe", "Show metadata and tile counts of an MBTiles file")]
fn subcommand_help(#[case] sub_command: &str, #[case] about: &str) {
	tilepack_cmd()
		.args([sub_command, "--help"])
		.assert()
		.success()
		.stdout(str::starts_with(about));
}

#[test]
fn invalid_bbox() {
	tilepack_cmd()
		.args(["download", "--bbox", "2,47,-5,50"])
		.assert()
		.failure()
		.code(2)
		.stderr(str::contains("--bbox"));
}
