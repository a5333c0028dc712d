//! The six parameters that define one synthesized sky image.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Arcseconds in one degree.
pub const ARCSEC_PER_DEGREE: f64 = 3600.0;

/// Center, scale, orientation and size of a requested sky image.
///
/// Angles are in degrees, `scale` in arcseconds per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyParams {
    /// Right ascension of the image center, [0, 360).
    pub ra: f64,
    /// Declination of the image center, [-90, 90].
    pub dec: f64,
    /// Arcseconds per pixel.
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    /// Camera rotation in degrees.
    pub rotation: f64,
}

impl SkyParams {
    pub fn new(ra: f64, dec: f64, scale: f64, width: u32, height: u32, rotation: f64) -> Self {
        Self {
            ra,
            dec,
            scale,
            width,
            height,
            rotation,
        }
    }

    /// Exact match on all six parameters.
    ///
    /// Floating-point fields are compared bit for bit, so `0.0` and `-0.0`
    /// differ and a `NaN` never matches anything but the same `NaN` payload.
    pub fn matches(&self, other: &SkyParams) -> bool {
        self.ra.to_bits() == other.ra.to_bits()
            && self.dec.to_bits() == other.dec.to_bits()
            && self.scale.to_bits() == other.scale.to_bits()
            && self.width == other.width
            && self.height == other.height
            && self.rotation.to_bits() == other.rotation.to_bits()
    }

    /// Angular size of the image in degrees, (width, height).
    pub fn field_of_view(&self) -> (f64, f64) {
        (
            self.width as f64 * self.scale / ARCSEC_PER_DEGREE,
            self.height as f64 * self.scale / ARCSEC_PER_DEGREE,
        )
    }

    /// Checks the ranges a caller-supplied request must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidParams(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::InvalidParams(format!(
                "scale must be a positive number of arcsec/pixel, got {}",
                self.scale
            )));
        }
        if !(0.0..360.0).contains(&self.ra) {
            return Err(Error::InvalidParams(format!(
                "RA must be in [0, 360), got {}",
                self.ra
            )));
        }
        if !(-90.0..=90.0).contains(&self.dec) {
            return Err(Error::InvalidParams(format!(
                "Dec must be in [-90, 90], got {}",
                self.dec
            )));
        }
        if !self.rotation.is_finite() {
            return Err(Error::InvalidParams(format!(
                "rotation must be finite, got {}",
                self.rotation
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SkyParams {
        SkyParams::new(83.8, -5.4, 2.5, 800, 600, 15.0)
    }

    #[test]
    fn test_matches_identical() {
        assert!(base().matches(&base()));
    }

    #[test]
    fn test_matches_fails_on_any_single_change() {
        let p = base();
        let variants = [
            SkyParams { ra: 83.9, ..p },
            SkyParams { dec: -5.5, ..p },
            SkyParams { scale: 2.6, ..p },
            SkyParams { width: 801, ..p },
            SkyParams { height: 601, ..p },
            SkyParams { rotation: 15.000001, ..p },
        ];
        for (i, v) in variants.iter().enumerate() {
            assert!(!p.matches(v), "variant {} should not match", i);
        }
    }

    #[test]
    fn test_matches_is_bit_exact() {
        let a = SkyParams { rotation: 0.0, ..base() };
        let b = SkyParams { rotation: -0.0, ..base() };
        assert!(!a.matches(&b));
    }

    #[test]
    fn test_field_of_view() {
        let p = SkyParams::new(0.0, 0.0, 36.0, 100, 200, 0.0);
        let (w, h) = p.field_of_view();
        assert!((w - 1.0).abs() < 1e-12);
        assert!((h - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        assert!(base().validate().is_ok());
        assert!(SkyParams { width: 0, ..base() }.validate().is_err());
        assert!(SkyParams { scale: 0.0, ..base() }.validate().is_err());
        assert!(SkyParams { scale: f64::NAN, ..base() }.validate().is_err());
        assert!(SkyParams { ra: 360.0, ..base() }.validate().is_err());
        assert!(SkyParams { dec: 90.5, ..base() }.validate().is_err());
        assert!(SkyParams { rotation: f64::INFINITY, ..base() }.validate().is_err());
        assert!(SkyParams { dec: -90.0, ..base() }.validate().is_ok());
    }
}
