//! Public definitions header synthesis.
//!
//! Library sources carry the layout of their opaque state structures in an
//! `#ifdef OPAQUE` ... `#endif` region. Given the files selected for one
//! target, the [`Resolver`] orders them by dependency tier, lifts those
//! regions out, and emits a single header that also declares per-category
//! size limits and tagged-union state structures covering exactly the
//! primitives that were built.

mod config;
mod error;
mod fragment;
mod header;
mod primitive;
mod priority;
mod resolver;

#[cfg(test)]
use cantrell_catalog as _;

pub use config::ResolverConfig;
pub use error::{ConfigError, ResolveError, Result};
pub use fragment::{END_MARKER, Fragment, START_MARKER, extract_fragment, scan_fragment};
pub use header::{HeaderLayout, Limits, polymorphic_struct};
pub use primitive::{Category, Primitive, PrimitiveRegistry};
pub use priority::PriorityTable;
pub use resolver::{DefinitionsHeader, ResolutionReport, Resolver, resolve};
