//! Error types for header resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a resolution. None of them leave a partial header behind.
#[derive(Debug, Error)]
pub enum ResolveError {
	/// A selected module has no entry in the priority table.
	#[error("no resolution priority for module '{module}' ({path})")]
	UnknownModule {
		/// Base name of the file without extension.
		module: String,
		/// The offending file.
		path: PathBuf,
	},

	/// A start marker was never followed by an end marker.
	#[error("{path}:{line}: opaque fragment is never closed")]
	UnterminatedFragment {
		path: PathBuf,
		/// Line of the start marker, 1-based.
		line: usize,
	},

	/// A file opens a second fragment.
	#[error("{path}:{line}: second opaque fragment (first one opened at line {first}), only one per file is supported")]
	MultipleFragments {
		path: PathBuf,
		/// Line of the first start marker, 1-based.
		first: usize,
		/// Line of the rejected start marker, 1-based.
		line: usize,
	},

	/// Reading a source file or writing the header failed.
	#[error("I/O error on {path}: {error}")]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	/// The rendered header could not replace the destination.
	#[error("failed to replace {path}: {error}")]
	Persist {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Errors in resolver configuration data.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("failed to read {path}: {error}")]
	Read {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or shape.
	#[error("failed to parse resolver config: {0}")]
	Parse(#[from] toml::de::Error),

	/// Two registry entries share a name.
	#[error("duplicate primitive name: '{0}'")]
	DuplicatePrimitive(String),

	/// A registry entry has an empty name.
	#[error("primitive names must not be empty")]
	EmptyPrimitiveName,

	/// A registry entry is missing from the priority table.
	#[error("primitive '{0}' has no resolution priority")]
	MissingPriority(String),
}

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;
