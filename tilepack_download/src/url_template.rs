//! Tile URL templates with `{z}`, `{x}` and `{y}` placeholders.

use anyhow::{Context, Result, ensure};
use reqwest::Url;
use std::fmt::{self, Display};
use tilepack_core::TileCoord;

/// WMTS GetTile endpoint of the SHOM marine chart layer.
pub const SHOM_WMTS_TEMPLATE: &str = "https://services.data.shom.fr/clevisu/wmts?layer=RASTER_MARINE_3857_WMTS&style=normal&tilematrixset=3857&Service=WMTS&Request=GetTile&Version=1.0.0&Format=image%2Fpng&TileMatrix={z}&TileCol={x}&TileRow={y}";

/// A URL with `{z}`, `{x}` and `{y}` placeholders for zoom, column and row.
///
/// ```
/// use tilepack_core::TileCoord;
/// use tilepack_download::UrlTemplate;
///
/// let template = UrlTemplate::new("https://tiles.example.org/{z}/{x}/{y}.png").unwrap();
/// let url = template.url_for(&TileCoord::new(8, 124, 86).unwrap()).unwrap();
/// assert_eq!(url.as_str(), "https://tiles.example.org/8/124/86.png");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
	/// Validates that the template has all placeholders and expands to an http(s) URL.
	pub fn new(template: &str) -> Result<UrlTemplate> {
		for placeholder in ["{z}", "{x}", "{y}"] {
			ensure!(
				template.contains(placeholder),
				"url template '{template}' is missing the placeholder {placeholder}"
			);
		}
		let template = UrlTemplate(template.to_string());

		let sample = template.url_for(&TileCoord { level: 0, x: 0, y: 0 })?;
		ensure!(
			matches!(sample.scheme(), "http" | "https"),
			"unsupported URL scheme '{}' in '{}', expected 'http' or 'https'",
			sample.scheme(),
			template.0
		);
		Ok(template)
	}

	/// Expands the template for `coord`.
	pub fn url_for(&self, coord: &TileCoord) -> Result<Url> {
		let url = self
			.0
			.replace("{z}", &coord.level.to_string())
			.replace("{x}", &coord.x.to_string())
			.replace("{y}", &coord.y.to_string());
		Url::parse(&url).with_context(|| format!("invalid tile url '{url}'"))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for UrlTemplate {
	fn default() -> Self {
		UrlTemplate(SHOM_WMTS_TEMPLATE.to_string())
	}
}

impl Display for UrlTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
