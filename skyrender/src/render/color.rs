//! B-V color index to RGB.

use image::Rgba;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

const MAX_INTENSITY: i32 = 255;
/// Green level of a white star.
const MID_INTENSITY: i32 = 220;
/// Darkest channel level, keeps colored stars visible.
const MIN_INTENSITY: i32 = 160;

/// Normalized temperature where the ramp switches from blue-white to red.
const WHITE_POINT: f64 = 0.4;

/// Color of a star with the given B-V index.
///
/// B-V runs from about -0.4 (hot, blue) to +2.0 (cool, red). Blue stars
/// keep full blue with slightly reduced red, red stars keep full red with
/// reduced blue, and green carries the white point in between.
pub fn star_color(bv: f64) -> Rgba<u8> {
    let t = ((bv + 0.4) / 2.4).clamp(0.0, 1.0);

    let (red, green, blue) = if t < WHITE_POINT {
        let green = MIN_INTENSITY + ((MID_INTENSITY - MIN_INTENSITY) as f64 * (t / WHITE_POINT)) as i32;
        ((green as f64 * 0.9) as i32, green, MAX_INTENSITY)
    } else {
        let t = (t - WHITE_POINT) / (1.0 - WHITE_POINT);
        let green = MID_INTENSITY - ((MID_INTENSITY - MIN_INTENSITY) as f64 * t) as i32;
        (MAX_INTENSITY, green, (green as f64 * 0.85) as i32)
    };

    Rgba([red as u8, green as u8, blue as u8, 255])
}
