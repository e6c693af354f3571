//! Error types for catalog scanning and target parsing.

use std::path::PathBuf;

use thiserror::Error;

use crate::target::{Arch, Dimension, Feature, Platform};

/// Errors that can occur while scanning a source tree or parsing a target.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// A key directory exists but could not be listed.
	#[error("failed to list {}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		error: walkdir::Error,
	},

	/// Platform name outside the supported set.
	#[error("unknown platform '{0}' (expected one of: {expected})", expected = Platform::expected())]
	UnknownPlatform(String),

	/// Architecture name outside the supported set.
	#[error("unknown architecture '{0}' (expected one of: {expected})", expected = Arch::expected())]
	UnknownArch(String),

	/// Feature name outside the supported set.
	#[error("unknown feature '{0}' (expected one of: {expected})", expected = Feature::expected())]
	UnknownFeature(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
