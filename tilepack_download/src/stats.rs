//! Download counters per zoom level and for a whole run.

use crate::FetchOutcome;
use std::{
	collections::BTreeMap,
	fmt::{self, Display},
};

/// Counters for one zoom level. Counters only ever grow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DownloadStats {
	pub expected: u64,
	pub downloaded: u64,
	pub skipped: u64,
	pub failed: u64,
}

impl DownloadStats {
	pub fn new(expected: u64) -> DownloadStats {
		DownloadStats {
			expected,
			..Default::default()
		}
	}

	pub fn record(&mut self, outcome: &FetchOutcome) {
		match outcome {
			FetchOutcome::Downloaded => self.downloaded += 1,
			FetchOutcome::Skipped => self.skipped += 1,
			FetchOutcome::Failed(_) => self.failed += 1,
		}
	}

	pub fn processed(&self) -> u64 {
		self.downloaded + self.skipped + self.failed
	}

	/// Tiles present on disk after the run.
	pub fn available(&self) -> u64 {
		self.downloaded + self.skipped
	}

	/// Share of expected tiles that are available, in percent. An empty plan counts as complete.
	pub fn success_rate(&self) -> f64 {
		if self.expected == 0 {
			100.0
		} else {
			self.available() as f64 * 100.0 / self.expected as f64
		}
	}

	fn add(&mut self, other: &DownloadStats) {
		self.expected += other.expected;
		self.downloaded += other.downloaded;
		self.skipped += other.skipped;
		self.failed += other.failed;
	}
}

impl Display for DownloadStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} downloaded, {} skipped, {} failed of {} ({:.1}%)",
			self.downloaded,
			self.skipped,
			self.failed,
			self.expected,
			self.success_rate()
		)
	}
}

/// Result of a download run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DownloadReport {
	pub levels: BTreeMap<u8, DownloadStats>,
}

impl DownloadReport {
	pub fn insert_level(&mut self, level: u8, stats: DownloadStats) {
		self.levels.insert(level, stats);
	}

	pub fn level(&self, level: u8) -> Option<&DownloadStats> {
		self.levels.get(&level)
	}

	pub fn total(&self) -> DownloadStats {
		let mut total = DownloadStats::default();
		for stats in self.levels.values() {
			total.add(stats);
		}
		total
	}
}

impl Display for DownloadReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (level, stats) in &self.levels {
			writeln!(f, "zoom {level:>2}: {stats}")?;
		}
		write!(f, "total  : {}", self.total())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::FailureReason;
	use pretty_assertions::assert_eq;

	#[test]
	fn record_outcomes() {
		let mut stats = DownloadStats::new(4);
		stats.record(&FetchOutcome::Downloaded);
		stats.record(&FetchOutcome::Skipped);
		stats.record(&FetchOutcome::Downloaded);
		stats.record(&FetchOutcome::Failed(FailureReason::Http(404)));

		assert_eq!(
			stats,
			DownloadStats {
				expected: 4,
				downloaded: 2,
				skipped: 1,
				failed: 1
			}
		);
		assert_eq!(stats.processed(), 4);
		assert_eq!(stats.success_rate(), 75.0);
	}

	#[test]
	fn empty_plan_is_complete() {
		assert_eq!(DownloadStats::new(0).success_rate(), 100.0);
	}

	#[test]
	fn report_totals() {
		let mut report = DownloadReport::default();
		report.insert_level(
			8,
			DownloadStats {
				expected: 30,
				downloaded: 28,
				skipped: 0,
				failed: 2,
			},
		);
		report.insert_level(
			9,
			DownloadStats {
				expected: 88,
				downloaded: 0,
				skipped: 88,
				failed: 0,
			},
		);

		let total = report.total();
		assert_eq!((total.expected, total.available(), total.failed), (118, 116, 2));
		assert_eq!(
			report.to_string(),
			"zoom  8: 28 downloaded, 0 skipped, 2 failed of 30 (93.3%)\n\
			 zoom  9: 0 downloaded, 88 skipped, 0 failed of 88 (100.0%)\n\
			 total  : 28 downloaded, 88 skipped, 2 failed of 118 (98.3%)"
		);
	}
}
