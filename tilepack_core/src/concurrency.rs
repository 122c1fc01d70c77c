//! Default worker counts for I/O-bound work.
//!
//! ```
//! use tilepack_core::ConcurrencyLimits;
//!
//! let limits = ConcurrencyLimits::default().capped(8);
//! assert!(limits.io_bound >= 1 && limits.io_bound <= 8);
//! ```

/// Concurrency limits derived from the number of logical CPUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyLimits {
	/// Parallel operations that mostly wait on the network or disk.
	pub io_bound: usize,
}

impl ConcurrencyLimits {
	pub fn new(io_bound: usize) -> Self {
		Self {
			io_bound: io_bound.max(1),
		}
	}

	/// Limits `io_bound` to at most `max`, e.g. to stay below a tile server's throttling threshold.
	pub fn capped(self, max: usize) -> Self {
		Self::new(self.io_bound.min(max))
	}
}

impl Default for ConcurrencyLimits {
	/// 3x CPU count.
	fn default() -> Self {
		Self::new(num_cpus::get() * 3)
	}
}
