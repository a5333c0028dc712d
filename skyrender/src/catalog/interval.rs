//! Right ascension intervals that may wrap through 0/360.

use crate::projection::normalize_ra;

/// Closed RA interval in degrees, normalized to `[0, 360)`.
///
/// `min > max` means the interval wraps through 0, e.g. `[350, 10]`.
/// The degenerate `[0, 0]` (which is what `[0, 360]` normalizes to) is the
/// full circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaInterval {
    min: f64,
    max: f64,
}

impl RaInterval {
    pub fn new(min: f64, max: f64) -> Self {
        let min = normalize_ra(min);
        let mut max = normalize_ra(max);
        if min == 0.0 && max == 0.0 {
            max = 360.0;
        }
        Self { min, max }
    }

    pub fn full() -> Self {
        Self {
            min: 0.0,
            max: 360.0,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// True when the interval passes through RA 0.
    pub fn wraps(&self) -> bool {
        self.min > self.max
    }

    pub fn contains(&self, ra: f64) -> bool {
        let ra = normalize_ra(ra);
        if self.wraps() {
            ra >= self.min || ra <= self.max
        } else {
            ra >= self.min && ra <= self.max
        }
    }

    pub fn intersects(&self, other: &RaInterval) -> bool {
        match (self.wraps(), other.wraps()) {
            // Both contain RA 0
            (true, true) => true,
            (false, true) => self.min <= other.max || self.max >= other.min,
            (true, false) => other.min <= self.max || other.max >= self.min,
            (false, false) => self.max >= other.min && self.min <= other.max,
        }
    }
}

/// Closed declination range test. Declinations never wrap.
pub fn dec_contains(min: f64, max: f64, dec: f64) -> bool {
    dec >= min && dec <= max
}

/// Overlap test for two closed declination ranges.
pub fn dec_intersects(min_a: f64, max_a: f64, min_b: f64, max_b: f64) -> bool {
    max_a >= min_b && min_a <= max_b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_membership() {
        let interval = RaInterval::new(350.0, 10.0);
        assert!(interval.wraps());
        assert!(interval.contains(355.0));
        assert!(interval.contains(5.0));
        assert!(interval.contains(0.0));
        assert!(interval.contains(350.0));
        assert!(interval.contains(10.0));
        assert!(!interval.contains(180.0));
        assert!(!interval.contains(349.9));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_plain_membership() {
        let interval = RaInterval::new(100.0, 120.0);
        assert!(!interval.wraps());
        assert!(interval.contains(100.0));
        assert!(interval.contains(110.0));
        assert!(interval.contains(120.0));
        assert!(!interval.contains(99.0));
        assert!(!interval.contains(121.0));
    }

    #[test]
    fn test_values_are_normalized() {
        let interval = RaInterval::new(-10.0, 370.0);
        assert_eq!(interval.min(), 350.0);
        assert_eq!(interval.max(), 10.0);
        assert!(interval.contains(-5.0));
        assert!(interval.contains(365.0));
        assert!(!interval.contains(-20.0));
    }

    #[test]
    fn test_zero_zero_is_full_circle() {
        for interval in [RaInterval::new(0.0, 0.0), RaInterval::new(0.0, 360.0)] {
            assert!(!interval.wraps());
            for ra in [0.0, 90.0, 180.0, 359.999] {
                assert!(interval.contains(ra), "{} should be inside", ra);
            }
        }
        assert_eq!(RaInterval::new(0.0, 360.0), RaInterval::full());
    }

    #[test]
    fn test_intersects_neither_wraps() {
        let a = RaInterval::new(10.0, 20.0);
        assert!(a.intersects(&RaInterval::new(15.0, 30.0)));
        assert!(a.intersects(&RaInterval::new(20.0, 30.0)));
        assert!(a.intersects(&RaInterval::new(0.5, 50.0)));
        assert!(!a.intersects(&RaInterval::new(21.0, 30.0)));
        assert!(!a.intersects(&RaInterval::new(1.0, 9.0)));
    }

    #[test]
    fn test_intersects_one_wraps() {
        let query = RaInterval::new(350.0, 10.0);
        assert!(RaInterval::new(5.0, 40.0).intersects(&query));
        assert!(RaInterval::new(300.0, 355.0).intersects(&query));
        assert!(!RaInterval::new(20.0, 340.0).intersects(&query));

        // Symmetric in argument order
        assert!(query.intersects(&RaInterval::new(5.0, 40.0)));
        assert!(!query.intersects(&RaInterval::new(20.0, 340.0)));
    }

    #[test]
    fn test_intersects_both_wrap() {
        let a = RaInterval::new(350.0, 10.0);
        let b = RaInterval::new(355.0, 1.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_full_circle_intersects_everything() {
        let full = RaInterval::full();
        assert!(full.intersects(&RaInterval::new(123.0, 124.0)));
        assert!(full.intersects(&RaInterval::new(359.0, 1.0)));
        assert!(RaInterval::new(200.0, 201.0).intersects(&full));
    }

    #[test]
    fn test_dec_ranges() {
        assert!(dec_contains(-10.0, 10.0, -10.0));
        assert!(dec_contains(-10.0, 10.0, 10.0));
        assert!(!dec_contains(-10.0, 10.0, 10.5));
        assert!(dec_intersects(-10.0, 10.0, 5.0, 20.0));
        assert!(dec_intersects(-10.0, 10.0, 10.0, 20.0));
        assert!(!dec_intersects(-10.0, 10.0, 11.0, 20.0));
        assert!(!dec_intersects(80.0, 90.0, -90.0, -80.0));
    }
}
