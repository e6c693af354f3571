//! Resolver configuration loaded from TOML.
//!
//! Every section is optional; an omitted section keeps the built-in Ordo
//! value. A registry override replaces the whole registry, and likewise for
//! the priority table.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::header::HeaderLayout;
use crate::primitive::{Primitive, PrimitiveRegistry};
use crate::priority::PriorityTable;
use crate::resolver::Resolver;

/// Raw resolver configuration as written in the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
	pub header: HeaderLayout,
	#[serde(rename = "primitive")]
	pub primitives: Option<Vec<Primitive>>,
	pub priority: Option<HashMap<String, u8>>,
}

impl ResolverConfig {
	pub fn from_toml(text: &str) -> Result<Self> {
		Ok(toml::from_str(text).map_err(ConfigError::Parse)?)
	}

	pub fn load(path: &Path) -> Result<Self> {
		let text = fs::read_to_string(path).map_err(|error| ConfigError::Read { path: path.to_path_buf(), error })?;
		Self::from_toml(&text)
	}

	/// Validates the configuration and builds a resolver from it.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::DuplicatePrimitive`] or [`ConfigError::EmptyPrimitiveName`]
	/// for a malformed registry, and [`ConfigError::MissingPriority`] when a
	/// registered primitive has no entry in the priority table.
	pub fn into_resolver(self) -> Result<Resolver> {
		let registry = match self.primitives {
			Some(primitives) => PrimitiveRegistry::new(primitives)?,
			None => PrimitiveRegistry::builtin(),
		};
		let priorities = match self.priority {
			Some(tiers) => PriorityTable::new(tiers),
			None => PriorityTable::builtin(),
		};

		if let Some(orphan) = registry.iter().find(|p| !priorities.contains(&p.name)) {
			return Err(ConfigError::MissingPriority(orphan.name.clone()).into());
		}

		Ok(Resolver::new(registry, priorities, self.header))
	}
}
