//! Per-pixel interest signals.
//!
//! Each detector reads the working image and writes its own [`SignalMap`];
//! none of them share mutable state, so [`extract_all`] runs them in
//! parallel.

pub mod edge;
pub mod saturation;
pub mod skin;

use std::time::Instant;

use tracing::debug;

use crate::config::Settings;
use crate::raster::{Image, CHANNELS};

/// One scalar per working pixel, row-major, each value in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalMap {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl SignalMap {
    /// Wrap computed values. `values.len()` must equal `width * height`.
    pub(crate) fn from_values(width: u32, height: u32, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), width as usize * height as usize);
        Self {
            width,
            height,
            values,
        }
    }

    /// Build a map by evaluating `f` on every pixel of `image`, one row per
    /// rayon task.
    pub(crate) fn per_pixel<F>(image: &Image, f: F) -> Self
    where
        F: Fn([u8; 3]) -> f64 + Sync,
    {
        use rayon::prelude::*;

        let (width, height) = image.dimensions();
        let mut values = vec![0.0; width as usize * height as usize];
        if width > 0 {
            values
                .par_chunks_mut(width as usize)
                .zip(image.as_raw().par_chunks(width as usize * CHANNELS))
                .for_each(|(out, row)| {
                    for (value, px) in out.iter_mut().zip(row.chunks_exact(CHANNELS)) {
                        *value = f([px[0], px[1], px[2]]);
                    }
                });
        }

        Self::from_values(width, height, values)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Value at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// All values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// The three detector outputs for one working image.
#[derive(Debug, Clone)]
pub struct Signals {
    pub edge: SignalMap,
    pub skin: SignalMap,
    pub saturation: SignalMap,
}

/// Perceptual luminance of an RGB sample, on the 0..255 scale.
///
/// Blue is weighted well above the usual Rec. 709 share; the weights are
/// tuned for crop selection rather than colorimetry and can exceed 255.
#[inline]
pub fn luminance(rgb: [u8; 3]) -> f64 {
    0.0722 * rgb[0] as f64 + 0.7152 * rgb[1] as f64 + 0.5126 * rgb[2] as f64
}

/// Luminance scaled so that mid-range pixels fall inside `[0, 1]`.
#[inline]
pub fn brightness(rgb: [u8; 3]) -> f64 {
    luminance(rgb) / 255.0
}

/// Run the edge, skin and saturation detectors concurrently.
pub fn extract_all(image: &Image, settings: &Settings) -> Signals {
    let start = Instant::now();

    let (edge, (skin, saturation)) = rayon::join(
        || edge::detect(image, settings.edge_radius),
        || {
            rayon::join(
                || skin::detect(image, settings),
                || saturation::detect(image, settings),
            )
        },
    );

    debug!(
        "Extracted signals for {}x{} in {:?}",
        image.width(),
        image.height(),
        start.elapsed()
    );

    Signals {
        edge,
        skin,
        saturation,
    }
}
