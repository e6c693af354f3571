//! Selection → definitions header.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{ResolveError, Result};
use crate::fragment::{Fragment, extract_fragment};
use crate::header::{HeaderLayout, Limits, polymorphic_struct, write_fragments};
use crate::primitive::{Category, Primitive, PrimitiveRegistry};
use crate::priority::PriorityTable;

/// Summary of one resolution, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionReport {
	/// Files classified as primitive implementations.
	pub primitive_files: usize,
	/// All other files.
	pub other_files: usize,
	/// Files that contributed an opaque fragment.
	pub fragments: usize,
	pub limits: Limits,
}

/// A fully rendered header, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionsHeader {
	pub text: String,
	pub report: ResolutionReport,
}

/// Turns a build selection into the public definitions header.
///
/// Holds the registry, priority table and layout it was built with; a
/// resolver never consults global state.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
	registry: PrimitiveRegistry,
	priorities: PriorityTable,
	layout: HeaderLayout,
}

impl Resolver {
	pub fn new(registry: PrimitiveRegistry, priorities: PriorityTable, layout: HeaderLayout) -> Self {
		Self { registry, priorities, layout }
	}

	pub fn registry(&self) -> &PrimitiveRegistry {
		&self.registry
	}

	pub fn priorities(&self) -> &PriorityTable {
		&self.priorities
	}

	pub fn layout(&self) -> &HeaderLayout {
		&self.layout
	}

	/// Renders the header for `files` without touching the destination.
	///
	/// The files are sorted by priority tier, split into primitive
	/// implementations and everything else, and their fragments emitted in
	/// that order. The category structs go between the two groups because the
	/// dispatch and facade modules embed them by value.
	///
	/// # Errors
	///
	/// * [`ResolveError::UnknownModule`] if a file's module has no priority.
	/// * [`ResolveError::Io`] if a file cannot be read.
	/// * [`ResolveError::UnterminatedFragment`] / [`ResolveError::MultipleFragments`] for malformed fragments.
	pub fn render(&self, files: &[PathBuf]) -> Result<DefinitionsHeader> {
		let sorted = self.priorities.sort(files)?;

		let mut primitive_files: Vec<(&Path, &Primitive)> = Vec::new();
		let mut other_files: Vec<&Path> = Vec::new();
		for path in &sorted {
			match self.registry.classify(path) {
				Some(primitive) => {
					debug!(path = %path.display(), primitive = %primitive.name, category = %primitive.category, "Primitive source");
					primitive_files.push((path.as_path(), primitive));
				}
				None => {
					debug!(path = %path.display(), "Supporting source");
					other_files.push(path.as_path());
				}
			}
		}

		let primitives: Vec<&Primitive> = primitive_files.iter().map(|(_, p)| *p).collect();
		let limits = Limits::compute(&primitives, self.layout.empty_limit);

		let primitive_fragments = read_fragments(primitive_files.iter().map(|(path, _)| *path))?;
		let other_fragments = read_fragments(other_files.iter().copied())?;

		let mut text = String::new();
		self.layout.write_open(&mut text);
		limits.write_to(&mut text);
		write_fragments(&mut text, &primitive_fragments);
		for category in Category::ALL {
			text.push('\n');
			text.push_str(&polymorphic_struct(category, &primitives));
		}
		write_fragments(&mut text, &other_fragments);
		self.layout.write_close(&mut text);

		let report = ResolutionReport {
			primitive_files: primitive_files.len(),
			other_files: other_files.len(),
			fragments: primitive_fragments.len() + other_fragments.len(),
			limits,
		};
		Ok(DefinitionsHeader { text, report })
	}

	/// Renders the header for `files` and writes it to `destination`.
	///
	/// The header is written to a temporary file next to `destination` and
	/// renamed over it, so on any error the previous header (if any) is left
	/// exactly as it was.
	///
	/// # Errors
	///
	/// Everything [`Resolver::render`] returns, plus [`ResolveError::Io`] /
	/// [`ResolveError::Persist`] if the header cannot be written.
	pub fn resolve(&self, destination: &Path, files: &[PathBuf]) -> Result<ResolutionReport> {
		let header = self.render(files)?;
		write_atomic(destination, &header.text)?;

		info!(
			destination = %destination.display(),
			primitives = header.report.primitive_files,
			others = header.report.other_files,
			fragments = header.report.fragments,
			"Wrote definitions header"
		);
		Ok(header.report)
	}
}

/// Resolves `files` into `destination` with the built-in registry, priorities and layout.
pub fn resolve(destination: &Path, files: &[PathBuf]) -> Result<ResolutionReport> {
	Resolver::default().resolve(destination, files)
}

fn read_fragments<'a>(paths: impl Iterator<Item = &'a Path>) -> Result<Vec<Fragment>> {
	let mut fragments = Vec::new();
	for path in paths {
		match extract_fragment(path)? {
			Some(fragment) => fragments.push(fragment),
			None => debug!(path = %path.display(), "No opaque fragment"),
		}
	}
	Ok(fragments)
}

fn write_atomic(destination: &Path, text: &str) -> Result<()> {
	let dir = match destination.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let io_err = |error| ResolveError::Io { path: destination.to_path_buf(), error };

	let existing = match fs::metadata(destination) {
		Ok(metadata) => Some(metadata.permissions()),
		Err(error) if error.kind() == ErrorKind::NotFound => None,
		Err(error) => return Err(io_err(error)),
	};

	let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
	tmp.write_all(text.as_bytes()).map_err(io_err)?;
	// Temporary files are created owner-only. A replaced header keeps its
	// mode, a new one is installed world-readable.
	match existing {
		Some(permissions) => tmp.as_file().set_permissions(permissions).map_err(io_err)?,
		#[cfg(unix)]
		None => {
			use std::os::unix::fs::PermissionsExt;
			tmp.as_file().set_permissions(fs::Permissions::from_mode(0o644)).map_err(io_err)?;
		}
		#[cfg(not(unix))]
		None => {}
	}
	tmp.persist(destination)
		.map_err(|e| ResolveError::Persist { path: destination.to_path_buf(), error: e.error })?;
	Ok(())
}
