//! Image providers.
//!
//! [`ImageService`] is the seam between a cache or UI and whatever produces
//! the sky image. [`CatalogImageService`] synthesizes it from the star
//! catalog; a remote cutout service or a fixed image file would implement
//! the same trait.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use image::RgbaImage;

use crate::catalog::CatalogReader;
use crate::error::Result;
use crate::footprint::SkyRegion;
use crate::params::SkyParams;
use crate::render::{RenderOptions, StarRenderer, max_magnitude};

/// Produces the image for one fixed set of [`SkyParams`].
#[async_trait]
pub trait ImageService: Send + Sync {
    fn params(&self) -> &SkyParams;

    async fn get_image(&self) -> Result<RgbaImage>;
}

/// Synthesizes a star field from a Parquet star catalog.
#[derive(Debug, Clone)]
pub struct CatalogImageService {
    params: SkyParams,
    catalog_path: PathBuf,
    options: RenderOptions,
    star_limit: Option<usize>,
}

impl CatalogImageService {
    pub fn new(params: SkyParams, catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            params,
            catalog_path: catalog_path.into(),
            options: RenderOptions::default(),
            star_limit: None,
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Stops painting after `limit` stars.
    pub fn with_star_limit(mut self, limit: Option<usize>) -> Self {
        self.star_limit = limit;
        self
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Runs the whole pipeline on the current thread.
    pub fn render(&self) -> Result<RgbaImage> {
        self.params.validate()?;
        let start = Instant::now();

        let catalog = CatalogReader::open(&self.catalog_path)?;
        let region = SkyRegion::covering(&self.params);
        let max_mag = max_magnitude(self.params.scale);

        tracing::debug!(
            "Coordinate range RA [{:.4}, {:.4}] (crosses 0/360: {}), Dec [{:.4}, {:.4}]",
            region.ra_min,
            region.ra_max,
            region.crosses_ra_360,
            region.dec_min,
            region.dec_max
        );
        tracing::debug!("Max magnitude = {:.2}", max_mag);

        let mut renderer = StarRenderer::new(&self.params, self.options);
        let mut total = 0usize;
        let mut bright = 0usize;
        let mut painted = 0usize;

        for star in catalog.stream_region(&region) {
            if self.star_limit.is_some_and(|limit| painted >= limit) {
                tracing::debug!("Star limit of {} reached", painted);
                break;
            }

            let star = star?;
            total += 1;
            if star.v_mag > max_mag {
                continue;
            }

            bright += 1;
            if renderer.add_star(star.ra, star.dec, star.v_mag, star.bv) {
                painted += 1;
            }
        }

        tracing::debug!(
            "Star retrieval complete. Found {} stars, {} inside magnitude limit, {} painted",
            total,
            bright,
            painted
        );
        tracing::info!(
            "Synthetic image generated in {} ms",
            start.elapsed().as_millis()
        );

        Ok(renderer.into_image())
    }
}

#[async_trait]
impl ImageService for CatalogImageService {
    fn params(&self) -> &SkyParams {
        &self.params
    }

    async fn get_image(&self) -> Result<RgbaImage> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.render()).await?
    }
}
