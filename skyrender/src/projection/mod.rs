//! Stereographic projection between sky coordinates and image pixels.
//!
//! Pixel axes follow the usual astronomical display convention: Y grows
//! downward (north is up) and RA grows to the left (east is left) for an
//! unrotated image. The projection point is the image center.
//!
//! Fields wider than [`MAX_FISHEYE_ANGLE`] are treated as fisheye views:
//! instead of clipping to the pixel rectangle, anything farther than 90
//! degrees from the center is rejected before projecting, since the
//! stereographic radius diverges toward the antipode.

use glam::DVec2;

use crate::params::{ARCSEC_PER_DEGREE, SkyParams};


/// Field width (degrees) above which the angular-distance gate replaces pixel clipping.
pub const MAX_FISHEYE_ANGLE: f64 = 90.0;

/// Below this magnitude the inverse RA denominator is treated as zero.
const RA_DENOMINATOR_EPSILON: f64 = 1e-10;

/// Radians to arcseconds.
const RAD_TO_ARCSEC: f64 = 180.0 / std::f64::consts::PI * ARCSEC_PER_DEGREE;

/// One celestial <-> pixel mapping, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    ra_center: f64,
    dec_center: f64,
    width: f64,
    height: f64,
    /// Arcseconds per pixel.
    scale: f64,
    /// Field width in degrees.
    field_width: f64,

    ra0: f64,
    sin_dec0: f64,
    cos_dec0: f64,
    /// Sine and cosine of the image rotation, which is the negated camera rotation.
    sin_rot: f64,
    cos_rot: f64,
}

impl Projection {
    /// Creates a projection centered on (`ra_center`, `dec_center`) degrees.
    ///
    /// `rotation` is the camera rotation in degrees; the image turns the opposite way.
    pub fn new(
        ra_center: f64,
        dec_center: f64,
        width: u32,
        height: u32,
        scale: f64,
        rotation: f64,
    ) -> Self {
        assert!(
            width > 0 && height > 0,
            "Projection needs a non-empty image, got {}x{}",
            width,
            height
        );
        assert!(
            scale > 0.0,
            "Projection scale must be positive, got {}",
            scale
        );

        let (sin_dec0, cos_dec0) = dec_center.to_radians().sin_cos();
        let (sin_rot, cos_rot) = (-rotation).to_radians().sin_cos();
        let width = width as f64;

        Self {
            ra_center,
            dec_center,
            width,
            height: height as f64,
            scale,
            field_width: width * scale / ARCSEC_PER_DEGREE,
            ra0: ra_center.to_radians(),
            sin_dec0,
            cos_dec0,
            sin_rot,
            cos_rot,
        }
    }

    pub fn from_params(params: &SkyParams) -> Self {
        Self::new(
            params.ra,
            params.dec,
            params.width,
            params.height,
            params.scale,
            params.rotation,
        )
    }

    /// Field width in degrees.
    pub fn field_width(&self) -> f64 {
        self.field_width
    }

    /// True when the fisheye angular-distance gate is active.
    pub fn is_fisheye(&self) -> bool {
        self.field_width > MAX_FISHEYE_ANGLE
    }

    /// Projects a sky position (degrees) to a pixel position.
    ///
    /// Returns `None` when the point falls outside the usable field: outside
    /// `[0, width) x [0, height)` for regular fields, or more than 90 degrees
    /// from the center for fisheye fields. A fisheye result may lie outside
    /// the pixel rectangle.
    pub fn sky_to_pixel(&self, ra: f64, dec: f64) -> Option<DVec2> {
        if self.is_fisheye() && self.angular_distance(ra, dec) > MAX_FISHEYE_ANGLE {
            return None;
        }

        let (sin_dec, cos_dec) = dec.to_radians().sin_cos();
        let (sin_dra, cos_dra) = (ra.to_radians() - self.ra0).sin_cos();

        let cos_dist = self.sin_dec0 * sin_dec + self.cos_dec0 * cos_dec * cos_dra;
        let k = 2.0 / (1.0 + cos_dist);

        // Plane coordinates, unit-sphere radians
        let x = k * cos_dec * sin_dra;
        let y = k * (self.cos_dec0 * sin_dec - self.sin_dec0 * cos_dec * cos_dra);

        let x_rot = x * self.cos_rot - y * self.sin_rot;
        let y_rot = x * self.sin_rot + y * self.cos_rot;

        let px = -x_rot * RAD_TO_ARCSEC / self.scale + self.width / 2.0;
        let py = -y_rot * RAD_TO_ARCSEC / self.scale + self.height / 2.0;

        if !px.is_finite() || !py.is_finite() {
            return None;
        }
        if !self.is_fisheye() && !self.contains_pixel(px, py) {
            return None;
        }

        Some(DVec2::new(px, py))
    }

    /// Maps a pixel position back to sky coordinates (RA, Dec in degrees).
    ///
    /// Returns `None` outside `[0, width) x [0, height)`. RA is normalized to `[0, 360)`.
    pub fn pixel_to_sky(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !self.contains_pixel(x, y) {
            return None;
        }

        let x_proj = -(x - self.width / 2.0) * self.scale / RAD_TO_ARCSEC;
        let y_proj = -(y - self.height / 2.0) * self.scale / RAD_TO_ARCSEC;

        // Inverse rotation
        let x1 = x_proj * self.cos_rot + y_proj * self.sin_rot;
        let y1 = -x_proj * self.sin_rot + y_proj * self.cos_rot;

        let rho = x1.hypot(y1);
        if rho == 0.0 {
            return Some((self.ra_center, self.dec_center));
        }

        let c = 2.0 * rho.atan2(2.0);
        let (sin_c, cos_c) = c.sin_cos();

        let sin_dec = (cos_c * self.sin_dec0 + y1 * sin_c * self.cos_dec0 / rho).clamp(-1.0, 1.0);
        let dec = sin_dec.asin();

        let denom = rho * self.cos_dec0 * cos_c - y1 * self.sin_dec0 * sin_c;
        let ra = if denom.abs() > RA_DENOMINATOR_EPSILON {
            self.ra0 + (x1 * sin_c).atan2(denom)
        } else {
            self.ra0
        };

        Some((normalize_ra(ra.to_degrees()), dec.to_degrees()))
    }

    /// Great-circle distance from the projection center, in degrees.
    pub fn angular_distance(&self, ra: f64, dec: f64) -> f64 {
        let (sin_dec, cos_dec) = dec.to_radians().sin_cos();
        let cos_dist = self.sin_dec0 * sin_dec
            + self.cos_dec0 * cos_dec * (ra.to_radians() - self.ra0).cos();
        cos_dist.clamp(-1.0, 1.0).acos().to_degrees()
    }

    fn contains_pixel(&self, x: f64, y: f64) -> bool {
        (0.0..self.width).contains(&x) && (0.0..self.height).contains(&y)
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_ra(ra: f64) -> f64 {
    let wrapped = ra.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}
