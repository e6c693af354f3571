//! Text generation for the definitions header.

use std::fmt::Write;

use serde::Deserialize;

use crate::fragment::Fragment;
use crate::primitive::{Category, Primitive};

/// Fixed parts of the generated header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderLayout {
	/// Include guard macro.
	pub guard: String,
	/// Headers included ahead of the definitions, as written between quotes.
	pub includes: Vec<String>,
	/// Value of a limit macro whose category has no selected primitive.
	///
	/// The limits size C arrays, and a zero-length array is not valid C.
	pub empty_limit: usize,
}

impl Default for HeaderLayout {
	fn default() -> Self {
		Self {
			guard: "ORDO_DEFINITIONS_H".into(),
			includes: vec!["ordo/common/identification.h".into(), "ordo/common/limits.h".into()],
			empty_limit: 1,
		}
	}
}

impl HeaderLayout {
	pub(crate) fn write_open(&self, out: &mut String) {
		out.push_str("/* AUTOGENERATED - DO NOT EDIT */\n\n");
		let _ = writeln!(out, "#ifndef {}", self.guard);
		let _ = writeln!(out, "#define {}", self.guard);
		if !self.includes.is_empty() {
			out.push('\n');
			for include in &self.includes {
				let _ = writeln!(out, "#include \"{include}\"");
			}
		}
	}

	pub(crate) fn write_close(&self, out: &mut String) {
		out.push_str("\n#endif\n");
	}
}

/// Category-wide size limits over the selected primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Limits {
	pub hash_block_len: usize,
	pub hash_digest_len: usize,
	pub block_block_len: usize,
}

impl Limits {
	/// Maximum lengths per category; a category with no primitive gets `empty`.
	pub fn compute(primitives: &[&Primitive], empty: usize) -> Self {
		let max = |category: Category, len: fn(&Primitive) -> usize| {
			primitives.iter().filter(|p| p.category == category).map(|p| len(p)).max().unwrap_or(empty)
		};

		Self {
			hash_block_len: max(Category::Hash, |p| p.block_len),
			hash_digest_len: max(Category::Hash, |p| p.digest_len),
			block_block_len: max(Category::Block, |p| p.block_len),
		}
	}

	pub(crate) fn write_to(&self, out: &mut String) {
		out.push('\n');
		let _ = writeln!(out, "#define HASH_BLOCK_LEN {}", self.hash_block_len);
		let _ = writeln!(out, "#define HASH_DIGEST_LEN {}", self.hash_digest_len);
		let _ = writeln!(out, "#define BLOCK_BLOCK_LEN {}", self.block_block_len);
	}
}

/// Tagged-union state struct for `category`.
///
/// The union holds one member per primitive of that category, in the given
/// order. With no such primitive the union block is left out entirely and
/// only the tag remains.
pub fn polymorphic_struct(category: Category, primitives: &[&Primitive]) -> String {
	let members: Vec<&Primitive> = primitives.iter().copied().filter(|p| p.category == category).collect();

	let mut src = String::new();
	let _ = writeln!(src, "struct {}_STATE", category.as_str());
	src.push_str("{\n");
	src.push_str("    prim_t primitive;\n");

	if !members.is_empty() {
		src.push('\n');
		src.push_str("    union\n");
		src.push_str("    {\n");
		for primitive in members {
			let _ = writeln!(src, "        struct {} {};", primitive.state_struct(), primitive.member());
		}
		src.push_str("    } jmp;\n");
	}

	src.push_str("};\n");
	src
}

/// Appends every fragment in order.
pub(crate) fn write_fragments<'a>(out: &mut String, fragments: impl IntoIterator<Item = &'a Fragment>) {
	for fragment in fragments {
		fragment.write_to(out);
	}
}
