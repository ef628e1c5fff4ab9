//! Catalog manifests for the folio site.
//!
//! A catalog lists the project cards and gallery images in display order:
//!
//! ```yaml
//! projects:
//!   - id: cyber-city
//!     name: Cyber City Sim
//!     category: web
//!     techs: [Three.js, WebGL]
//!     complexity: 9
//!     fun: 7
//! gallery:
//!   - id: 1
//!     title: URBAN RONIN
//!     theme: urban
//!     views: 1247
//!     date: "2025-12-26"
//! ```
//!
//! Entries convert into [`folio_core::Tile`]s for the listing pipeline.

mod catalog;
mod error;

pub use catalog::{Catalog, Entry, Scalar, Section};
pub use error::CatalogError;

/// The catalog shipped with the site.
pub const BUILTIN_CATALOG: &str = include_str!("../data/catalog.yaml");

/// Parse [`BUILTIN_CATALOG`].
pub fn builtin() -> Result<Catalog, CatalogError> {
    Catalog::from_yaml(BUILTIN_CATALOG)
}
