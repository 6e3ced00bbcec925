//! Spot catalog.
//!
//! Spots are read from a JSON seed file and held in memory. The catalog
//! can be reloaded in the background; each reload reports which cached
//! listings it made stale.

mod catalog;
mod error;

pub use catalog::{SpotCatalog, SpotRepository};
pub use error::CatalogError;
