//! Renders a synthetic star field described by a config file.
//!
//! Usage: `render_sky <config.yaml|config.json> <output.png>`

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use common::log_setup::setup_logging;
use skyrender::{RenderConfig, ResultCache};

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging("info", "render_sky");

    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(output_path), None) = (args.next(), args.next(), args.next())
    else {
        bail!("Usage: render_sky <config.yaml|config.json> <output.png>");
    };
    let config_path = PathBuf::from(config_path);
    let output_path = PathBuf::from(output_path);

    let config = RenderConfig::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;
    tracing::info!(
        "Rendering {}x{} at RA {}, Dec {}, {} arcsec/px, rotation {}",
        config.width,
        config.height,
        config.ra,
        config.dec,
        config.scale,
        config.rotation
    );

    let cache = ResultCache::new(config.image_service());
    let image = cache.get_image().await.context("Failed to render image")?;

    image
        .save(&output_path)
        .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
    tracing::info!("Saved {}", output_path.display());

    Ok(())
}
