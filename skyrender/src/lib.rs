//! Skyrender - synthetic star field images from a star catalog.
//!
//! Given a sky position, pixel scale, rotation and image size, this library
//! produces an RGBA image of the stars a camera would see there. The images
//! are meant as plate-solvable references for telescope pointing checks.
//!
//! Pipeline:
//! - Compute the RA/Dec box covered by the image
//! - Stream catalog stars inside the box, pruning Parquet row groups by statistics
//! - Drop stars fainter than the scale-dependent magnitude limit
//! - Project each star with a stereographic projection and paint it
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use skyrender::{CatalogImageService, ImageService, ResultCache, SkyParams};
//!
//! let params = SkyParams::new(83.82, -5.39, 2.5, 1280, 960, 0.0);
//! let cache = ResultCache::new(CatalogImageService::new(params, "tycho2.parquet"));
//!
//! let image = cache.get_image().await?;
//! image.save("orion.png")?;
//! ```

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod footprint;
pub mod params;
pub mod projection;
pub mod render;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

// ============================================================================
// Request and results
// ============================================================================

pub use cache::ResultCache;
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use params::SkyParams;
pub use service::{CatalogImageService, ImageService};

// ============================================================================
// Building blocks
// ============================================================================

pub use catalog::{CatalogReader, RaInterval, StarRecord, StarStream};
pub use footprint::SkyRegion;
pub use projection::Projection;
pub use render::{PsfProfile, RenderOptions, StarRenderer, max_magnitude, star_color, star_radius};
