//! Sky region covered by an image, used to prune catalog queries.
//!
//! The region is a conservative RA/Dec box: it may hold a little more sky
//! than the image shows, never less. Fields that reach a celestial pole are
//! widened to the full RA circle.

use crate::catalog::interval::{RaInterval, dec_contains};
use crate::params::{ARCSEC_PER_DEGREE, SkyParams};
use crate::projection::normalize_ra;


/// `|dec| + half field` beyond which the polar bounds are used directly.
pub const POLAR_THRESHOLD: f64 = 88.0;

/// A corner farther than this from the equator invalidates the flat-frame estimate.
const CORNER_POLE_LIMIT: f64 = 89.0;

/// Smallest cos(dec) used to stretch RA offsets.
const MIN_COS_DEC: f64 = 0.001;

/// RA/Dec bounding box of an image footprint, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyRegion {
    pub ra_min: f64,
    pub ra_max: f64,
    pub dec_min: f64,
    pub dec_max: f64,
    pub crosses_ra_360: bool,
    /// The region contains a pole; RA spans `[0, 360]`.
    pub is_circumpolar: bool,
}

impl SkyRegion {
    /// Bounding box of an image centered at (`center_ra`, `center_dec`).
    pub fn compute(
        center_ra: f64,
        center_dec: f64,
        scale: f64,
        width: u32,
        height: u32,
        rotation: f64,
    ) -> Self {
        let width_deg = width as f64 * scale / ARCSEC_PER_DEGREE;
        let height_deg = height as f64 * scale / ARCSEC_PER_DEGREE;

        if center_dec.abs() + width_deg.max(height_deg) / 2.0 > POLAR_THRESHOLD {
            return Self::polar(center_dec, width_deg, height_deg);
        }

        let (sin_rot, cos_rot) = rotation.to_radians().sin_cos();
        let half_width = width_deg / 2.0;
        let half_height = height_deg / 2.0;

        let corners = [
            (-half_width, -half_height),
            (-half_width, half_height),
            (half_width, -half_height),
            (half_width, half_height),
        ];

        let mut ra_offsets = (f64::MAX, f64::MIN);
        let mut dec_offsets = (f64::MAX, f64::MIN);

        for (x, y) in corners {
            // Corner offset in a tangent frame rotated with the image
            let d_ra = x * cos_rot - y * sin_rot;
            let d_dec = x * sin_rot + y * cos_rot;

            let corner_dec = center_dec + d_dec;
            if corner_dec.abs() > CORNER_POLE_LIMIT {
                return Self::polar(center_dec, width_deg, height_deg);
            }

            // RA circles shrink by cos(dec)
            let mut cos_dec = corner_dec.to_radians().cos();
            if cos_dec.abs() < MIN_COS_DEC {
                cos_dec = MIN_COS_DEC.copysign(cos_dec);
            }
            let ra_offset = d_ra / cos_dec;

            ra_offsets = (ra_offsets.0.min(ra_offset), ra_offsets.1.max(ra_offset));
            dec_offsets = (dec_offsets.0.min(d_dec), dec_offsets.1.max(d_dec));
        }

        let dec_min = (center_dec + dec_offsets.0).max(-90.0);
        let dec_max = (center_dec + dec_offsets.1).min(90.0);

        let ra_span = ra_offsets.1 - ra_offsets.0;
        if ra_span >= 360.0 {
            return Self {
                ra_min: 0.0,
                ra_max: 360.0,
                dec_min,
                dec_max,
                crosses_ra_360: true,
                is_circumpolar: false,
            };
        }

        let ra_min = normalize_ra(center_ra + ra_offsets.0);
        let ra_max = normalize_ra(center_ra + ra_offsets.1);

        Self {
            ra_min,
            ra_max,
            dec_min,
            dec_max,
            crosses_ra_360: ra_span.abs() > 180.0 || ra_max < ra_min,
            is_circumpolar: false,
        }
    }

    pub fn from_params(params: &SkyParams) -> Self {
        Self::compute(
            params.ra,
            params.dec,
            params.scale,
            params.width,
            params.height,
            params.rotation,
        )
    }

    /// Region for a catalog query: [`SkyRegion::from_params`] widened so
    /// that every pixel of the image falls inside it.
    ///
    /// The flat corner estimate ignores that the image's equator-ward corners
    /// sag below `center_dec - half_height` by roughly `r^2 / 2 * tan(dec)`,
    /// so regular regions get that margin on both declination bounds.
    ///
    /// Polar regions size their far bound from the larger half-extent, which
    /// misses the corners of the image. A stereographic image never reaches
    /// farther from its center than the half-diagonal, so the far bound moves
    /// to `center_dec -/+ half_diagonal`.
    pub fn covering(params: &SkyParams) -> Self {
        let region = Self::from_params(params);
        let (width_deg, height_deg) = params.field_of_view();
        let half_diagonal = width_deg.hypot(height_deg) / 2.0;

        if region.is_circumpolar {
            return if params.dec > 0.0 {
                Self {
                    dec_min: region.dec_min.min(params.dec - half_diagonal).max(-90.0),
                    ..region
                }
            } else {
                Self {
                    dec_max: region.dec_max.max(params.dec + half_diagonal).min(90.0),
                    ..region
                }
            };
        }

        let half_diagonal = half_diagonal.to_radians();
        let outer_dec = (params.dec.abs().to_radians() + half_diagonal)
            .min(CORNER_POLE_LIMIT.to_radians());
        let margin = (half_diagonal * half_diagonal / 2.0 * outer_dec.tan()).to_degrees();

        region.expand_dec(margin)
    }

    /// Polar region: full RA circle, pole-ward Dec clamped to the pole.
    fn polar(center_dec: f64, width_deg: f64, height_deg: f64) -> Self {
        let max_extent = width_deg.max(height_deg) / 2.0;

        let (dec_min, dec_max) = if center_dec > 0.0 {
            ((center_dec - max_extent).max(-90.0), 90.0)
        } else {
            (-90.0, (center_dec + max_extent).min(90.0))
        };

        Self {
            ra_min: 0.0,
            ra_max: 360.0,
            dec_min,
            dec_max,
            crosses_ra_360: true,
            is_circumpolar: true,
        }
    }

    /// Widens both declination bounds by `margin` degrees, clamped to the poles.
    pub fn expand_dec(self, margin: f64) -> Self {
        Self {
            dec_min: (self.dec_min - margin).max(-90.0),
            dec_max: (self.dec_max + margin).min(90.0),
            ..self
        }
    }

    pub fn ra_interval(&self) -> RaInterval {
        RaInterval::new(self.ra_min, self.ra_max)
    }

    pub fn contains(&self, ra: f64, dec: f64) -> bool {
        self.ra_interval().contains(ra) && dec_contains(self.dec_min, self.dec_max, dec)
    }
}
