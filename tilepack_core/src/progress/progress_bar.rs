//! Lightweight terminal progress bar.
//!
//! Renders `message▕bar▏pos/len (pct%) rate eta` on stderr. Nothing is drawn
//! when stderr is not a terminal, so logs and test output stay clean.

use parking_lot::Mutex;
use std::{
	cmp::min,
	env,
	fmt::Write as _,
	io::{self, IsTerminal, Write},
	sync::Arc,
	time::{Duration, Instant},
};

struct Inner {
	message: String,
	len: u64,
	pos: u64,
	start: Instant,
	visible: bool,
}

impl Inner {
	fn redraw(&self) {
		if !self.visible {
			return;
		}

		let len = self.len.max(1);
		let pos = self.pos.min(len);
		let elapsed = self.start.elapsed().as_secs_f64();
		let per_sec = if elapsed > 0.0 { pos as f64 / elapsed } else { 0.0 };
		let eta_secs = if per_sec > 0.0 {
			((len - pos) as f64 / per_sec).max(0.0)
		} else {
			0.0
		};

		let percent = (pos as f64 * 100.0 / len as f64).floor() as u64;
		let right = format!(
			"▏{}/{} ({:>3}%) {:>6} {:>5}",
			pos,
			len,
			percent,
			format_rate(per_sec),
			format_eta(Duration::from_secs_f64(eta_secs))
		);
		let taken = self.message.chars().count() + right.chars().count() + 1;
		let width = terminal_width().saturating_sub(taken).max(10);

		let mut line = String::new();
		let _ = write!(&mut line, "{}▕{}{}", self.message, make_bar(pos, len, width), right);

		let mut stderr = io::stderr();
		let _ = write!(stderr, "\r\x1b[2K{line}");
		let _ = stderr.flush();
	}
}

/// A terminal progress bar handle, cloneable and thread-safe.
#[derive(Clone)]
pub struct ProgressBar {
	inner: Arc<Mutex<Inner>>,
}

impl ProgressBar {
	/// Creates a bar with a message and maximum value and draws it once.
	pub fn new(message: &str, max_value: u64) -> ProgressBar {
		Self::with_visibility(message, max_value, io::stderr().is_terminal())
	}

	/// Creates a bar that tracks state but never draws.
	pub fn new_hidden(message: &str, max_value: u64) -> ProgressBar {
		Self::with_visibility(message, max_value, false)
	}

	fn with_visibility(message: &str, max_value: u64, visible: bool) -> ProgressBar {
		let inner = Inner {
			message: message.to_string(),
			len: max_value,
			pos: 0,
			start: Instant::now(),
			visible,
		};
		inner.redraw();
		ProgressBar {
			inner: Arc::new(Mutex::new(inner)),
		}
	}

	pub fn set_position(&self, value: u64) {
		let mut inner = self.inner.lock();
		inner.pos = min(value, inner.len);
		inner.redraw();
	}

	pub fn inc(&self, value: u64) {
		let mut inner = self.inner.lock();
		inner.pos = inner.pos.saturating_add(value).min(inner.len);
		inner.redraw();
	}

	pub fn position(&self) -> u64 {
		self.inner.lock().pos
	}

	/// Sets the position to the maximum and ends the line.
	pub fn finish(&self) {
		let mut inner = self.inner.lock();
		inner.pos = inner.len;
		inner.redraw();
		if inner.visible {
			let _ = io::stderr().write_all(b"\n");
			let _ = io::stderr().flush();
		}
	}
}

// $COLUMNS if set, 80 otherwise
fn terminal_width() -> usize {
	env::var("COLUMNS")
		.ok()
		.and_then(|cols| cols.parse::<usize>().ok())
		.map_or(80, |v| v.max(10))
}

fn make_bar(pos: u64, len: u64, width: usize) -> String {
	let frac = (pos as f64 / len.max(1) as f64).clamp(0.0, 1.0);
	let exact = frac * width as f64;
	let whole = (exact.floor() as usize).min(width);
	let partials = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

	let mut bar = "█".repeat(whole);
	if whole < width {
		let index = ((exact - whole as f64) * 8.0).floor() as usize;
		bar.push(partials[index.min(7)]);
		bar.push_str(&" ".repeat(width - whole - 1));
	}
	bar
}

fn format_rate(per_sec: f64) -> String {
	if !per_sec.is_finite() {
		return "--/s".to_string();
	}
	if per_sec >= 1_000.0 {
		format!("{:.1}k/s", per_sec / 1_000.0)
	} else {
		format!("{per_sec:.0}/s")
	}
}

fn format_eta(d: Duration) -> String {
	let total = d.as_secs();
	let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
	if h > 0 {
		format!("{h:02}:{m:02}:{s:02}")
	} else {
		format!("{m:02}:{s:02}")
	}
}
