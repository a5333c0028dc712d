//! Star painting onto an RGBA buffer.
//!
//! Star size follows an empirical magnitude-to-radius model: brighter stars
//! and finer pixel scales give larger discs. Two profiles are available, a
//! flat filled disc and a Moffat PSF whose contributions add up so that
//! nearby stars blend instead of overwriting each other.

pub mod color;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use serde::{Deserialize, Serialize};

use crate::params::SkyParams;
use crate::projection::Projection;
pub use color::star_color;


/// Dark gray sky.
pub const BACKGROUND: Rgba<u8> = Rgba([20, 20, 20, 255]);

/// Reference FWHM in pixels at 1 arcsec/pixel.
const BASE_FWHM: f64 = 125.0;

/// Moffat falloff exponent.
const MOFFAT_BETA: f32 = 2.5;

/// The Moffat window extends this many alphas from the center.
const MOFFAT_WINDOW: f32 = 5.0;

/// Point spread function used to paint each star.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsfProfile {
    /// Flat filled disc.
    Disc,
    /// Moffat profile, additively blended.
    #[default]
    Moffat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub profile: PsfProfile,
    /// Colorize stars by B-V index; white otherwise.
    pub use_color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            profile: PsfProfile::Moffat,
            use_color: true,
        }
    }
}

/// Disc radius in pixels for a star of `magnitude` at `scale` arcsec/pixel.
pub fn star_radius(magnitude: f64, scale: f64) -> f64 {
    let fwhm = BASE_FWHM / scale;
    let flux = 10f64.powf(-0.3 * magnitude);
    let half_light_radius = fwhm / (2.0 * std::f64::consts::LN_2.sqrt()) * flux.sqrt();

    half_light_radius * 2.0 * scale.powf(0.42)
}

/// Faintest magnitude worth painting at `scale` arcsec/pixel.
pub fn max_magnitude(scale: f64) -> f64 {
    -1.8 * scale.ln() + 17.0
}

/// Paints catalog stars into one image.
#[derive(Debug)]
pub struct StarRenderer {
    image: RgbaImage,
    projection: Projection,
    scale: f64,
    options: RenderOptions,
}

impl StarRenderer {
    pub fn new(params: &SkyParams, options: RenderOptions) -> Self {
        Self {
            image: RgbaImage::from_pixel(params.width, params.height, BACKGROUND),
            projection: Projection::from_params(params),
            scale: params.scale,
            options,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Projects and paints one star. Returns false when the star is off the image.
    pub fn add_star(&mut self, ra: f64, dec: f64, magnitude: f64, bv: f64) -> bool {
        let Some(pos) = self.projection.sky_to_pixel(ra, dec) else {
            return false;
        };
        // Fisheye projections are not clipped to the image
        let (width, height) = self.image.dimensions();
        if pos.x < 0.0 || pos.x > width as f64 || pos.y < 0.0 || pos.y > height as f64 {
            return false;
        }

        let color = if self.options.use_color {
            star_color(bv)
        } else {
            color::WHITE
        };

        match self.options.profile {
            PsfProfile::Disc => self.paint_disc(pos.x, pos.y, magnitude, color),
            PsfProfile::Moffat => self.paint_moffat(pos.x as f32, pos.y as f32, magnitude, color),
        }

        true
    }

    fn paint_disc(&mut self, x: f64, y: f64, magnitude: f64, color: Rgba<u8>) {
        let radius = star_radius(magnitude, self.scale);
        draw_filled_circle_mut(
            &mut self.image,
            (x.round() as i32, y.round() as i32),
            radius.round() as i32,
            color,
        );
    }

    fn paint_moffat(&mut self, x: f32, y: f32, magnitude: f64, color: Rgba<u8>) {
        // Moffat wings read brighter than a disc, so both inputs are damped
        let magnitude = magnitude * 8.0 / 12.0 + 1.5;
        let scale = 0.56 * self.scale + 9.5;
        let size = star_radius(magnitude, scale);

        let alpha = size as f32;
        let amplitude = (size / 2.0) as f32;
        let alpha_sq = alpha * alpha;
        let window = (MOFFAT_WINDOW * alpha) as i32 as f32;

        let (width, height) = self.image.dimensions();
        let x_min = ((x - window) as i32).max(0);
        let x_max = ((x + window) as i32).min(width as i32 - 1);
        let y_min = ((y - window) as i32).max(0);
        let y_max = ((y + window) as i32).min(height as i32 - 1);

        for py in y_min..=y_max {
            for px in x_min..=x_max {
                let dx = px as f32 - x;
                let dy = py as f32 - y;
                let r_sq = dx * dx + dy * dy;
                let intensity = amplitude * (1.0 + r_sq / alpha_sq).powf(-MOFFAT_BETA);

                let pixel = self.image.get_pixel_mut(px as u32, py as u32);
                for c in 0..3 {
                    // Float to u8 casts saturate at 255
                    let add = (intensity * color.0[c] as f32) as u8;
                    pixel.0[c] = pixel.0[c].saturating_add(add);
                }
                pixel.0[3] = 255;
            }
        }
    }
}
