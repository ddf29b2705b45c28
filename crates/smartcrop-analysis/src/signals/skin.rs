//! Skin-tone likelihood.
//!
//! Compares each pixel's chromaticity (its RGB direction, ignoring
//! intensity) with a reference skin colour, gated by brightness so shadows
//! and blown highlights are never reported as skin.

use super::{brightness, SignalMap};
use crate::config::Settings;
use crate::raster::Image;

/// Similarity of a pixel's colour direction to `reference`: `1 - distance`
/// between the pixel's unit-length RGB vector and `reference` as given.
/// Black has no direction and scores 0.
pub fn similarity(rgb: [u8; 3], reference: &[f64; 3]) -> f64 {
    let [r, g, b] = rgb.map(f64::from);
    let magnitude = (r * r + g * g + b * b).sqrt();
    if magnitude == 0.0 {
        return 0.0;
    }

    let dr = r / magnitude - reference[0];
    let dg = g / magnitude - reference[1];
    let db = b / magnitude - reference[2];

    1.0 - (dr * dr + dg * dg + db * db).sqrt()
}

/// Skin likelihood per pixel, in `[0, 1]`.
pub fn detect(image: &Image, settings: &Settings) -> SignalMap {
    let threshold = settings.skin_threshold;
    let min_brightness = settings.min_skin_brightness;
    let max_brightness = settings.max_skin_brightness;
    let reference = settings.skin_color;

    SignalMap::per_pixel(image, |rgb| {
        let likelihood = similarity(rgb, &reference);
        let lightness = brightness(rgb);

        if likelihood > threshold && lightness >= min_brightness && lightness <= max_brightness {
            ((likelihood - threshold) / (1.0 - threshold)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    })
}
