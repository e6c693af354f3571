//! Closed target enumerations and the keys built from them.
//!
//! Every dimension has a `generic` value standing for "not specific to any
//! value of this dimension". A non-generic value's canonical name doubles as
//! its directory name in the source tree.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::CatalogError;

/// One axis of the target space.
pub trait Dimension: Copy + Eq + 'static {
	/// The value matching every target on this axis.
	const GENERIC: Self;

	/// Canonical lower-case name.
	fn as_str(self) -> &'static str;

	/// Comma separated list of accepted names, for error messages.
	fn expected() -> String;

	/// Directory segment for this value, `None` for the generic value.
	fn segment(self) -> Option<&'static str> {
		(self != Self::GENERIC).then(|| self.as_str())
	}
}

/// Operating system a build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Platform {
	Generic,
	Linux,
	Win32,
	Darwin,
	Freebsd,
	Openbsd,
	Netbsd,
}

/// CPU architecture a build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Arch {
	Generic,
	Amd64,
}

/// Optional CPU feature a build may enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Feature {
	Generic,
	AesNi,
}

macro_rules! dimension {
	($ty:ident, $unknown:ident) => {
		impl Dimension for $ty {
			const GENERIC: Self = Self::Generic;

			fn as_str(self) -> &'static str {
				self.into()
			}

			fn expected() -> String {
				Self::iter().map(Self::as_str).collect::<Vec<_>>().join(", ")
			}
		}

		impl FromStr for $ty {
			type Err = CatalogError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::iter()
					.find(|value| value.as_str() == s)
					.ok_or_else(|| CatalogError::$unknown(s.to_owned()))
			}
		}
	};
}

dimension!(Platform, UnknownPlatform);
dimension!(Arch, UnknownArch);
dimension!(Feature, UnknownFeature);

impl Platform {
	/// Platform of the running host, `Generic` when it has no dedicated sources.
	pub fn host() -> Self {
		if cfg!(target_os = "linux") {
			Self::Linux
		} else if cfg!(target_os = "windows") {
			Self::Win32
		} else if cfg!(target_os = "macos") {
			Self::Darwin
		} else if cfg!(target_os = "freebsd") {
			Self::Freebsd
		} else if cfg!(target_os = "openbsd") {
			Self::Openbsd
		} else if cfg!(target_os = "netbsd") {
			Self::Netbsd
		} else {
			Self::Generic
		}
	}
}

/// Index into the catalog: one (platform, arch, feature) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionKey {
	pub platform: Platform,
	pub arch: Arch,
	pub feature: Feature,
}

impl SelectionKey {
	/// The tree root.
	pub const GENERIC: Self = Self::new(Platform::Generic, Arch::Generic, Feature::Generic);

	pub const fn new(platform: Platform, arch: Arch, feature: Feature) -> Self {
		Self { platform, arch, feature }
	}

	/// Directory holding this key's candidates under `root`.
	///
	/// Generic components contribute no path segment, so `(linux, generic, generic)`
	/// maps to `root/linux` and `(generic, amd64, aes_ni)` to `root/amd64/aes_ni`.
	pub fn dir(self, root: &Path) -> PathBuf {
		let mut dir = root.to_path_buf();
		dir.extend([self.platform.segment(), self.arch.segment(), self.feature.segment()].into_iter().flatten());
		dir
	}

	/// Every key of the target space.
	pub fn all() -> impl Iterator<Item = Self> {
		Platform::iter().flat_map(|platform| {
			Arch::iter().flat_map(move |arch| Feature::iter().map(move |feature| Self::new(platform, arch, feature)))
		})
	}
}

impl fmt::Display for SelectionKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.platform, self.arch, self.feature)
	}
}
