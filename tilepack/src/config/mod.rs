mod download;
mod main;
mod package;

pub use download::DownloadSection;
pub use main::Config;
pub use package::PackageSection;

use std::path::{Path, PathBuf};

/// Makes a relative path relative to `base` instead of the working directory.
fn resolve_path(path: &mut Option<PathBuf>, base: &Path) {
	if let Some(p) = path {
		if p.is_relative() {
			*p = base.join(&*p);
		}
	}
}
