//! Opaque fragment extraction.
//!
//! A fragment is the text between a line reading exactly [`START_MARKER`] and
//! the next line reading exactly [`END_MARKER`]. Files are scanned lazily,
//! line by line, with a two-state machine.
//!
//! Markers are compared on raw bytes, so sources need not be UTF-8 outside
//! their fragment. Fragment lines are decoded lossily.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ResolveError, Result};

pub const START_MARKER: &str = "#ifdef OPAQUE";
pub const END_MARKER: &str = "#endif";

/// Interior lines of one opaque region, markers excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
	/// Line of the start marker, 1-based.
	pub start: usize,
	pub lines: Vec<String>,
}

impl Fragment {
	/// Appends the fragment to `out`, preceded by a blank line.
	pub fn write_to(&self, out: &mut String) {
		out.push('\n');
		for line in &self.lines {
			out.push_str(line);
			out.push('\n');
		}
	}
}

enum State {
	Outside,
	Inside(Fragment),
}

/// Reads the opaque fragment of the file at `path`.
///
/// # Errors
///
/// See [`scan_fragment`]; failing to open or read the file is
/// [`ResolveError::Io`].
pub fn extract_fragment(path: &Path) -> Result<Option<Fragment>> {
	let file = File::open(path).map_err(|error| ResolveError::Io { path: path.to_path_buf(), error })?;
	scan_fragment(BufReader::new(file), path)
}

/// Scans `reader` for at most one opaque fragment; `path` only labels errors.
///
/// A file without a start marker yields `None`. An end marker outside a
/// fragment is an ordinary `#endif` and is skipped.
///
/// # Errors
///
/// * [`ResolveError::UnterminatedFragment`] if input ends inside a fragment.
/// * [`ResolveError::MultipleFragments`] if a second start marker follows a closed fragment.
pub fn scan_fragment(mut reader: impl BufRead, path: &Path) -> Result<Option<Fragment>> {
	let mut state = State::Outside;
	let mut found: Option<Fragment> = None;
	let mut buf = Vec::new();
	let mut number = 0;

	loop {
		buf.clear();
		let read = reader
			.read_until(b'\n', &mut buf)
			.map_err(|error| ResolveError::Io { path: path.to_path_buf(), error })?;
		if read == 0 {
			break;
		}
		number += 1;
		let line = strip_line_ending(&buf);

		state = match state {
			State::Outside if line == START_MARKER.as_bytes() => {
				if let Some(first) = &found {
					return Err(ResolveError::MultipleFragments { path: path.to_path_buf(), first: first.start, line: number });
				}
				State::Inside(Fragment { start: number, lines: Vec::new() })
			}
			State::Outside => State::Outside,
			State::Inside(fragment) if line == END_MARKER.as_bytes() => {
				found = Some(fragment);
				State::Outside
			}
			State::Inside(mut fragment) => {
				fragment.lines.push(String::from_utf8_lossy(line).into_owned());
				State::Inside(fragment)
			}
		};
	}

	match state {
		State::Outside => Ok(found),
		State::Inside(fragment) => Err(ResolveError::UnterminatedFragment { path: path.to_path_buf(), line: fragment.start }),
	}
}

/// Drops a trailing `\n` or `\r\n`, as [`BufRead::lines`] does.
fn strip_line_ending(line: &[u8]) -> &[u8] {
	match line.strip_suffix(b"\n") {
		Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
		None => line,
	}
}
