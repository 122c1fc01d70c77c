//! Persisting downloaded tiles.
//!
//! [`FileStore`] writes each tile to a temporary file in the destination
//! directory and renames it into place, so a tile path either holds a complete
//! payload or does not exist.

use anyhow::{Context, Result};
use std::{fmt::Debug, fs, io::Write, path::Path};
use tempfile::NamedTempFile;
use tilepack_core::Blob;

/// Where the fetcher puts validated tiles.
pub trait TileStoreTrait: Debug + Send + Sync {
	/// Writes `blob` to `path`, creating missing parent directories.
	fn write(&self, path: &Path, blob: &Blob) -> Result<()>;
}

/// Atomic writes to the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileStore;

impl TileStoreTrait for FileStore {
	fn write(&self, path: &Path, blob: &Blob) -> Result<()> {
		let parent = path
			.parent()
			.with_context(|| format!("tile path {path:?} has no parent directory"))?;
		fs::create_dir_all(parent)?;

		let mut file = NamedTempFile::new_in(parent)?;
		file.write_all(blob.as_slice())?;
		file.as_file().sync_all()?;
		file.persist(path).map_err(|e| e.error)?;
		Ok(())
	}
}
