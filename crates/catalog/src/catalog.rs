//! On-disk index of candidate source files keyed by target.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{CatalogError, Result};
use crate::selection::BuildSelection;
use crate::target::{Arch, Dimension, Feature, Platform, SelectionKey};

/// Candidate source files for every key of one source tree.
///
/// Built once per run by [`SourceCatalog::scan`] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
	candidates: HashMap<SelectionKey, Vec<PathBuf>>,
}

impl SourceCatalog {
	/// Indexes every key directory under `root`.
	///
	/// Only regular files directly inside a key directory are candidates for
	/// that key. A key whose directory is absent gets no candidates; that is
	/// never an error. Candidates are sorted by file name.
	///
	/// # Errors
	///
	/// Returns [`CatalogError::Io`](crate::CatalogError::Io) if an existing
	/// key directory cannot be listed.
	pub fn scan(root: impl Into<PathBuf>) -> Result<Self> {
		let root = root.into();
		let mut candidates = HashMap::new();

		for key in SelectionKey::all() {
			let dir = key.dir(&root);
			let files = if dir.is_dir() { list_files(&dir)? } else { Vec::new() };
			if !files.is_empty() {
				debug!(key = %key, dir = %dir.display(), files = files.len(), "Indexed key directory");
			}
			candidates.insert(key, files);
		}

		let total: usize = candidates.values().map(Vec::len).sum();
		info!(root = %root.display(), files = total, "Scanned source tree");
		Ok(Self { candidates })
	}

	/// Candidates recorded for `key`, empty if its directory did not exist.
	pub fn candidates(&self, key: SelectionKey) -> &[PathBuf] {
		self.candidates.get(&key).map(Vec::as_slice).unwrap_or_default()
	}

	/// Picks the files to build for one target.
	///
	/// Keys are visited from most to least specific and a file is only taken
	/// if its module name has not been taken yet:
	///
	/// 1. `(platform, arch, feature)` for each enabled feature, then `(platform, arch, generic)`.
	/// 2. `(platform, arch, generic)`, then `(platform, generic, generic)`.
	/// 3. `(platform, generic, generic)`, then `(generic, generic, generic)`.
	///
	/// The architecture stays fixed to the requested one throughout the first
	/// tier, so feature-specific sources only ever apply to their own arch.
	pub fn select(&self, platform: Platform, arch: Arch, features: impl IntoIterator<Item = Feature>) -> BuildSelection {
		let mut selection = BuildSelection::default();

		let enabled: BTreeSet<Feature> = features.into_iter().filter(|f| *f != Feature::Generic).collect();
		for feature in enabled.iter().copied().chain([Feature::Generic]) {
			self.take(&mut selection, SelectionKey::new(platform, arch, feature));
		}
		for arch in with_generic(arch) {
			self.take(&mut selection, SelectionKey::new(platform, arch, Feature::Generic));
		}
		for platform in with_generic(platform) {
			self.take(&mut selection, SelectionKey::new(platform, Arch::Generic, Feature::Generic));
		}

		info!(
			platform = %platform,
			arch = %arch,
			features = ?enabled,
			modules = selection.len(),
			"Selected sources"
		);
		selection
	}

	fn take(&self, selection: &mut BuildSelection, key: SelectionKey) {
		let mut added = 0usize;
		for path in self.candidates(key) {
			if selection.offer(path) {
				added += 1;
			}
		}
		debug!(key = %key, added, "Selection tier");
	}
}

/// `value` followed by the generic value, without repeating generic.
fn with_generic<T: Dimension>(value: T) -> impl Iterator<Item = T> {
	std::iter::once(value).chain((value != T::GENERIC).then_some(T::GENERIC))
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
		let entry = entry.map_err(|error| CatalogError::Io {
			path: error.path().unwrap_or(dir).to_path_buf(),
			error,
		})?;
		// Follows symlinks; a dangling link is not a file.
		if entry.path().is_file() {
			files.push(entry.into_path());
		}
	}
	Ok(files)
}

#[cfg(test)]
mod tests;
