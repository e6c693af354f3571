//! Primitive registry: which algorithms exist and how large their state is.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::error::{ConfigError, Result};

/// Closed classification of primitive kinds.
///
/// Declaration order is the order the polymorphic structs are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
	Block,
	Hash,
	Stream,
	BlockMode,
}

impl Category {
	pub const ALL: [Category; 4] = [Category::Block, Category::Hash, Category::Stream, Category::BlockMode];

	/// Upper-case name used as the struct prefix (`BLOCK_MODE`).
	pub fn as_str(self) -> &'static str {
		self.into()
	}
}

/// One registered algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Primitive {
	pub name: String,
	pub category: Category,
	#[serde(default)]
	pub block_len: usize,
	#[serde(default)]
	pub digest_len: usize,
}

impl Primitive {
	pub fn new(name: impl Into<String>, category: Category) -> Self {
		Self { name: name.into(), category, block_len: 0, digest_len: 0 }
	}

	pub fn with_block_len(mut self, block_len: usize) -> Self {
		self.block_len = block_len;
		self
	}

	pub fn with_digest_len(mut self, digest_len: usize) -> Self {
		self.digest_len = digest_len;
		self
	}

	/// Name of the primitive's own state struct (`AES_STATE`).
	pub fn state_struct(&self) -> String {
		format!("{}_STATE", self.name.to_uppercase())
	}

	/// Union member name inside the category struct (`aes`).
	pub fn member(&self) -> String {
		self.name.to_lowercase()
	}
}

/// Immutable set of known primitives, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveRegistry {
	primitives: Vec<Primitive>,
}

impl PrimitiveRegistry {
	/// Builds a registry, rejecting empty or duplicate names.
	pub fn new(primitives: Vec<Primitive>) -> Result<Self> {
		let mut seen = HashSet::new();
		for primitive in &primitives {
			if primitive.name.is_empty() {
				return Err(ConfigError::EmptyPrimitiveName.into());
			}
			if !seen.insert(primitive.name.as_str()) {
				return Err(ConfigError::DuplicatePrimitive(primitive.name.clone()).into());
			}
		}
		Ok(Self { primitives })
	}

	/// The primitives shipped with the Ordo library.
	pub fn builtin() -> Self {
		let primitives = vec![
			Primitive::new("rc4", Category::Stream),
			Primitive::new("md5", Category::Hash).with_block_len(64).with_digest_len(16),
			Primitive::new("sha1", Category::Hash).with_block_len(64).with_digest_len(20),
			Primitive::new("sha256", Category::Hash).with_block_len(64).with_digest_len(32),
			Primitive::new("skein256", Category::Hash).with_block_len(32).with_digest_len(32),
			Primitive::new("aes", Category::Block).with_block_len(16),
			Primitive::new("threefish256", Category::Block).with_block_len(32),
			Primitive::new("nullcipher", Category::Block).with_block_len(16),
			Primitive::new("ecb", Category::BlockMode),
			Primitive::new("cbc", Category::BlockMode),
			Primitive::new("cfb", Category::BlockMode),
			Primitive::new("ofb", Category::BlockMode),
			Primitive::new("ctr", Category::BlockMode),
		];
		Self { primitives }
	}

	pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
		self.primitives.iter()
	}

	pub fn get(&self, name: &str) -> Option<&Primitive> {
		self.primitives.iter().find(|p| p.name == name)
	}

	pub fn len(&self) -> usize {
		self.primitives.len()
	}

	pub fn is_empty(&self) -> bool {
		self.primitives.is_empty()
	}

	/// Primitive implemented by the source file at `path`, if any.
	///
	/// A file implements a primitive when `<name>.c` occurs anywhere in its
	/// path. This is a substring test: `src/mysha1.c` counts as `sha1`, and a
	/// directory named `aes.c/` would claim everything under it. When several
	/// names match, the first registered one wins.
	pub fn classify(&self, path: &Path) -> Option<&Primitive> {
		let path = path.to_string_lossy();
		self.primitives.iter().find(|p| path.contains(&format!("{}.c", p.name)))
	}
}

impl Default for PrimitiveRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}
