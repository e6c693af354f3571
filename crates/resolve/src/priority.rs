//! Resolution order of source modules.
//!
//! Opaque structs may embed other modules' structs by value, so the header
//! must declare them in dependency order. Each module name maps to a tier;
//! lower tiers are emitted first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ResolveError, Result};

/// Tier per module name (file base name without extension).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
	tiers: HashMap<String, u8>,
}

impl PriorityTable {
	pub fn new<S: Into<String>>(tiers: impl IntoIterator<Item = (S, u8)>) -> Self {
		Self { tiers: tiers.into_iter().map(|(name, tier)| (name.into(), tier)).collect() }
	}

	/// The Ordo library's module tiers.
	pub fn builtin() -> Self {
		Self::new([
			// Foundations
			("alg", 0),
			("utils", 0),
			("features", 0),
			("error", 0),
			("version", 0),
			("endianness", 0),
			("identification", 0),
			("os_random", 1),
			("curve25519", 1),
			// Primitives
			("sha1", 2),
			("sha256", 2),
			("md5", 2),
			("skein256", 2),
			("rc4", 2),
			("aes", 2),
			("threefish256", 2),
			("nullcipher", 2),
			("ecb", 2),
			("cbc", 2),
			("ctr", 2),
			("cfb", 2),
			("ofb", 2),
			// Dispatch
			("block_ciphers", 3),
			("block_modes", 3),
			("stream_ciphers", 3),
			("hash_functions", 4),
			// Facades
			("enc_block", 5),
			("enc_stream", 5),
			("digest", 5),
			("hmac", 6),
			("hkdf", 6),
			("pbkdf2", 7),
			("ordo", 8),
		])
	}

	pub fn tier(&self, module: &str) -> Option<u8> {
		self.tiers.get(module).copied()
	}

	pub fn contains(&self, module: &str) -> bool {
		self.tiers.contains_key(module)
	}

	pub fn len(&self) -> usize {
		self.tiers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tiers.is_empty()
	}

	/// Returns `files` stably sorted by tier.
	///
	/// # Errors
	///
	/// Returns [`ResolveError::UnknownModule`] for the first file whose module
	/// has no tier.
	pub fn sort(&self, files: &[PathBuf]) -> Result<Vec<PathBuf>> {
		let mut keyed = Vec::with_capacity(files.len());
		for path in files {
			let module = module_of(path);
			let tier = self.tier(&module).ok_or_else(|| ResolveError::UnknownModule { module, path: path.clone() })?;
			keyed.push((tier, path.clone()));
		}
		keyed.sort_by_key(|(tier, _)| *tier);
		Ok(keyed.into_iter().map(|(_, path)| path).collect())
	}
}

impl Default for PriorityTable {
	fn default() -> Self {
		Self::builtin()
	}
}

/// Module name of a source file: its base name without the last extension.
fn module_of(path: &Path) -> String {
	path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default()
}
