//! Raster tile formats and signature sniffing.
//!
//! A tile's format is known from two independent sources: the file extension
//! in a tile tree and the magic bytes at the start of its content. Downloads
//! are validated against the magic bytes, never against a `Content-Type`
//! header.
//!
//! ```
//! use tilepack_core::TileFormat;
//!
//! let mut filename = String::from("86.PNG");
//! assert_eq!(TileFormat::from_filename(&mut filename), Some(TileFormat::PNG));
//! assert_eq!(filename, "86");
//!
//! assert!(TileFormat::PNG.matches_signature(b"\x89PNG\r\n\x1a\n...."));
//! assert!(!TileFormat::PNG.matches_signature(b"<ServiceExceptionReport>"));
//! ```

use anyhow::{Result, bail};
use image::ImageFormat;
use std::fmt::{self, Display};

/// Raster formats a tile service may deliver.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum TileFormat {
	JPG,
	PNG,
	WEBP,
}

impl TileFormat {
	/// Lowercase name, as used in MBTiles `format` metadata.
	pub fn as_str(&self) -> &'static str {
		match self {
			TileFormat::JPG => "jpg",
			TileFormat::PNG => "png",
			TileFormat::WEBP => "webp",
		}
	}

	/// File extension without the leading dot.
	pub fn as_extension(&self) -> &'static str {
		self.as_str()
	}

	pub fn as_mime_str(&self) -> &'static str {
		match self {
			TileFormat::JPG => "image/jpeg",
			TileFormat::PNG => "image/png",
			TileFormat::WEBP => "image/webp",
		}
	}

	/// Parses a format name case-insensitively (`jpeg` is accepted for `jpg`).
	pub fn try_from_str(value: &str) -> Result<TileFormat> {
		Ok(match value.to_lowercase().trim() {
			"jpg" | "jpeg" => TileFormat::JPG,
			"png" => TileFormat::PNG,
			"webp" => TileFormat::WEBP,
			_ => bail!("unknown tile format: '{value}', expected one of: jpg, png, webp"),
		})
	}

	/// Strips a recognised extension from `filename` and returns its format.
	///
	/// The filename is left untouched if the extension is not recognised.
	pub fn from_filename(filename: &mut String) -> Option<TileFormat> {
		let index = filename.rfind('.')?;
		let format = TileFormat::try_from_str(&filename[index + 1..]).ok()?;
		filename.truncate(index);
		Some(format)
	}

	/// Detects the format from the content's magic bytes.
	pub fn sniff(bytes: &[u8]) -> Option<TileFormat> {
		match image::guess_format(bytes).ok()? {
			ImageFormat::Jpeg => Some(TileFormat::JPG),
			ImageFormat::Png => Some(TileFormat::PNG),
			ImageFormat::WebP => Some(TileFormat::WEBP),
			_ => None,
		}
	}

	/// `true` if `bytes` start with this format's signature.
	pub fn matches_signature(&self, bytes: &[u8]) -> bool {
		TileFormat::sniff(bytes) == Some(*self)
	}
}

impl Display for TileFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for TileFormat {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		TileFormat::try_from_str(s)
	}
}

impl TryFrom<String> for TileFormat {
	type Error = anyhow::Error;

	fn try_from(value: String) -> Result<Self> {
		TileFormat::try_from_str(&value)
	}
}

impl From<TileFormat> for String {
	fn from(format: TileFormat) -> Self {
		format.as_str().to_string()
	}
}
