//! Source catalog and module selection.
//!
//! A library source tree nests directories by platform, then architecture,
//! then CPU feature. [`SourceCatalog::scan`] indexes that tree once and
//! [`SourceCatalog::select`] picks, for one target, the most specific file
//! for every module name found in it.

mod catalog;
mod error;
mod selection;
mod target;

pub use catalog::SourceCatalog;
pub use error::{CatalogError, Result};
pub use selection::{BuildSelection, ModuleName, same_module};
pub use target::{Arch, Dimension, Feature, Platform, SelectionKey};
