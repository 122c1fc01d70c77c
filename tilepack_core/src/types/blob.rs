//! [`Blob`]: owned tile bytes.
//!
//! ```rust
//! use tilepack_core::Blob;
//!
//! let blob = Blob::from(vec![0x89, 0x50, 0x4E, 0x47]);
//! assert_eq!(blob.len(), 4);
//! assert_eq!(blob.as_slice(), b"\x89PNG");
//! ```

use std::fmt::Debug;

/// A thin wrapper around `Vec<u8>` holding the content of one tile or response body.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Blob(Vec<u8>);

impl Blob {
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(value: Vec<u8>) -> Self {
		Blob(value)
	}
}

impl From<&[u8]> for Blob {
	fn from(value: &[u8]) -> Self {
		Blob(value.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(value: &[u8; N]) -> Self {
		Blob(value.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(value: &str) -> Self {
		Blob(value.as_bytes().to_vec())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let preview: String = self.0.iter().take(8).map(|b| format!("{b:02x}")).collect();
		if self.0.len() > 8 {
			write!(f, "Blob({}): {preview}…", self.0.len())
		} else {
			write!(f, "Blob({}): {preview}", self.0.len())
		}
	}
}
