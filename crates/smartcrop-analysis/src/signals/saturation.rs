//! Colour saturation strength.

use super::{brightness, SignalMap};
use crate::config::Settings;
use crate::raster::Image;

/// HSL saturation of an RGB sample, in `[0, 1]`.
pub fn hsl_saturation(rgb: [u8; 3]) -> f64 {
    let [r, g, b] = rgb.map(|c| c as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    if max == min {
        return 0.0;
    }

    let delta = max - min;
    let lightness = (max + min) / 2.0;
    if lightness > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    }
}

/// Saturation signal per pixel, in `[0, 1]`.
///
/// Only pixels whose saturation lies in `(threshold, ceiling]` and whose
/// brightness lies inside the saturation brightness band contribute.
pub fn detect(image: &Image, settings: &Settings) -> SignalMap {
    let threshold = settings.saturation_threshold;
    let ceiling = settings.saturation_ceiling;
    let min_brightness = settings.min_saturation_brightness;
    let max_brightness = settings.max_saturation_brightness;

    SignalMap::per_pixel(image, |rgb| {
        let saturation = hsl_saturation(rgb);
        let lightness = brightness(rgb);

        if saturation > threshold
            && saturation <= ceiling
            && lightness >= min_brightness
            && lightness <= max_brightness
        {
            ((saturation - threshold) / (1.0 - threshold)).clamp(0.0, 1.0)
        } else {
            0.0
        }
    })
}
