//! A geographical bounding box in degrees.
//!
//! The field order everywhere in this workspace is `west, south, east, north`,
//! i.e. `min_lon, min_lat, max_lon, max_lat`. This is also the order of the
//! MBTiles `bounds` metadata value.
//!
//! # Examples
//!
//! ```
//! use tilepack_core::GeoBBox;
//!
//! let bbox = GeoBBox::new(-5.0, 47.0, 2.0, 50.0).unwrap();
//! assert_eq!(bbox.center(), (-1.5, 48.5));
//! assert_eq!(bbox.to_string(), "-5,47,2,50");
//! ```

use anyhow::{Result, bail, ensure};
use std::fmt::{self, Debug, Display};

/// Rectangular geographic extent.
///
/// Invariants (enforced by [`GeoBBox::new`]): `min_lat < max_lat`,
/// `min_lon < max_lon`, latitudes within `[-90, 90]`, longitudes within
/// `[-180, 180]`.
#[derive(Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub struct GeoBBox {
	pub min_lon: f64,
	pub min_lat: f64,
	pub max_lon: f64,
	pub max_lat: f64,
}

impl GeoBBox {
	/// Creates a validated bounding box from `west, south, east, north`.
	///
	/// # Errors
	/// Returns an error if a value is not finite, out of range, or if a minimum
	/// is not strictly smaller than its maximum.
	pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<GeoBBox> {
		GeoBBox::from_edges(min_lon, min_lat, max_lon, max_lat).checked()
	}

	/// Builds a box from edges that are already known to be valid, such as tile corners.
	pub(crate) fn from_edges(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> GeoBBox {
		GeoBBox {
			min_lon,
			min_lat,
			max_lon,
			max_lat,
		}
	}

	fn checked(self) -> Result<GeoBBox> {
		for value in [self.min_lon, self.min_lat, self.max_lon, self.max_lat] {
			ensure!(value.is_finite(), "bbox values must be finite numbers: {self:?}");
		}
		ensure!(
			self.min_lon >= -180.0 && self.max_lon <= 180.0,
			"longitudes must be within [-180, 180]: {self:?}"
		);
		ensure!(
			self.min_lat >= -90.0 && self.max_lat <= 90.0,
			"latitudes must be within [-90, 90]: {self:?}"
		);
		ensure!(self.min_lon < self.max_lon, "min_lon must be < max_lon: {self:?}");
		ensure!(self.min_lat < self.max_lat, "min_lat must be < max_lat: {self:?}");
		Ok(self)
	}

	/// Center of the box as `(lon, lat)`.
	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_lon + self.max_lon) / 2.0,
			(self.min_lat + self.max_lat) / 2.0,
		)
	}
}

impl Debug for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"GeoBBox(lon: {} .. {}, lat: {} .. {})",
			self.min_lon, self.max_lon, self.min_lat, self.max_lat
		)
	}
}

impl Display for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{},{}", self.min_lon, self.min_lat, self.max_lon, self.max_lat)
	}
}

impl TryFrom<Vec<f64>> for GeoBBox {
	type Error = anyhow::Error;

	fn try_from(input: Vec<f64>) -> Result<Self> {
		if input.len() != 4 {
			bail!("bbox must contain exactly 4 numbers (west, south, east, north), got {}", input.len());
		}
		GeoBBox::new(input[0], input[1], input[2], input[3])
	}
}

impl From<GeoBBox> for Vec<f64> {
	fn from(bbox: GeoBBox) -> Self {
		vec![bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat]
	}
}

impl std::str::FromStr for GeoBBox {
	type Err = anyhow::Error;

	/// Parses `"west,south,east,north"`; spaces and semicolons also separate values.
	fn from_str(s: &str) -> Result<Self> {
		let values = s
			.split([' ', ',', ';'])
			.filter(|v| !v.is_empty())
			.map(|v| v.parse::<f64>().map_err(|e| anyhow::anyhow!("invalid bbox value '{v}': {e}")))
			.collect::<Result<Vec<f64>>>()?;
		GeoBBox::try_from(values)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn new_and_accessors() -> Result<()> {
		let bbox = GeoBBox::new(-5.0, 47.0, 2.0, 50.0)?;
		assert_eq!((bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat), (-5.0, 47.0, 2.0, 50.0));
		assert_eq!(bbox.center(), (-1.5, 48.5));
		Ok(())
	}

	#[rstest]
	#[case(2.0, 47.0, -5.0, 50.0)]
	#[case(-5.0, 50.0, 2.0, 47.0)]
	#[case(-5.0, 47.0, -5.0, 50.0)]
	#[case(-181.0, 47.0, 2.0, 50.0)]
	#[case(-5.0, -91.0, 2.0, 50.0)]
	#[case(-5.0, 47.0, f64::INFINITY, 50.0)]
	fn new_rejects_invalid(#[case] w: f64, #[case] s: f64, #[case] e: f64, #[case] n: f64) {
		assert!(GeoBBox::new(w, s, e, n).is_err());
	}

	#[test]
	fn parse_from_string() -> Result<()> {
		let bbox: GeoBBox = "-5,47, 2;50".parse()?;
		assert_eq!((bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat), (-5.0, 47.0, 2.0, 50.0));
		assert!("-5,47,2".parse::<GeoBBox>().is_err());
		assert!("-5,47,2,north".parse::<GeoBBox>().is_err());
		Ok(())
	}

	#[test]
	fn vec_conversion() -> Result<()> {
		let bbox = GeoBBox::try_from(vec![1.0, 2.0, 3.0, 4.0])?;
		assert_eq!(Vec::<f64>::from(bbox), vec![1.0, 2.0, 3.0, 4.0]);
		assert!(GeoBBox::try_from(vec![1.0, 2.0]).is_err());
		Ok(())
	}

	#[test]
	fn display_and_debug() -> Result<()> {
		let bbox = GeoBBox::new(-5.625, 46.07, 2.8125, 50.73)?;
		assert_eq!(bbox.to_string(), "-5.625,46.07,2.8125,50.73");
		assert_eq!(format!("{bbox:?}"), "GeoBBox(lon: -5.625 .. 2.8125, lat: 46.07 .. 50.73)");
		Ok(())
	}
}
