//! The ordered result of one selection run.

use std::borrow::Borrow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use indexmap::map::Entry;

/// Identity of a logical module: the base name of its source file.
///
/// `linux/amd64/aes_ni/aes.c` and `aes.c` are the same module, and at most
/// one of them is built.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleName(OsString);

impl ModuleName {
	/// Module name of `path`, `None` if the path has no file name.
	pub fn of(path: &Path) -> Option<Self> {
		path.file_name().map(|name| Self(name.to_os_string()))
	}
}

impl Borrow<OsStr> for ModuleName {
	fn borrow(&self) -> &OsStr {
		&self.0
	}
}

impl fmt::Display for ModuleName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0.to_string_lossy())
	}
}

/// Returns true if both paths are (possibly different variants of) the same module.
pub fn same_module(a: &Path, b: &Path) -> bool {
	a.file_name() == b.file_name()
}

/// Winning source file per module, in the order the modules were first seen.
///
/// Insertion order follows selection precedence; consumers that need a
/// different order (the resolver's priority sort) re-sort a copy.
#[derive(Debug, Clone, Default)]
pub struct BuildSelection {
	modules: IndexMap<ModuleName, PathBuf>,
}

impl BuildSelection {
	/// Adds `path` unless a file for the same module was already selected.
	///
	/// Returns whether the path was added.
	pub(crate) fn offer(&mut self, path: &Path) -> bool {
		let Some(name) = ModuleName::of(path) else {
			return false;
		};
		match self.modules.entry(name) {
			Entry::Occupied(_) => false,
			Entry::Vacant(slot) => {
				slot.insert(path.to_path_buf());
				true
			}
		}
	}

	pub fn len(&self) -> usize {
		self.modules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}

	/// Returns true if a file for module `name` (a base name such as `aes.c`) was selected.
	pub fn contains(&self, name: impl AsRef<OsStr>) -> bool {
		self.modules.contains_key(name.as_ref())
	}

	/// Winning path for module `name`.
	pub fn get(&self, name: impl AsRef<OsStr>) -> Option<&Path> {
		self.modules.get(name.as_ref()).map(PathBuf::as_path)
	}

	pub fn module_names(&self) -> impl Iterator<Item = &ModuleName> {
		self.modules.keys()
	}

	pub fn into_paths(self) -> Vec<PathBuf> {
		self.modules.into_values().collect()
	}
}
