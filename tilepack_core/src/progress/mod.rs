//! Progress indicators for long-running acquisition and packaging jobs.
//!
//! ```rust
//! use tilepack_core::progress::get_progress_bar;
//!
//! let progress = get_progress_bar("zoom 8", 30);
//! progress.inc(10);
//! progress.finish();
//! ```

mod progress_bar;

pub use progress_bar::ProgressBar;

/// Creates a progress bar that draws on stderr when stderr is a terminal.
#[must_use]
pub fn get_progress_bar(message: &str, max_value: u64) -> ProgressBar {
	ProgressBar::new(message, max_value)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn overflow_and_finish_do_not_panic() {
		let progress = get_progress_bar("OverflowTest", 5);
		progress.set_position(10);
		progress.inc(3);
		progress.finish();
		assert_eq!(progress.position(), 5);
	}
}
