//! Positional weighting: centre and rule-of-thirds bias, border falloff.
//!
//! The mask is a function of a pixel's position relative to the image, so it
//! looks the same at every working resolution.

use rayon::prelude::*;

use crate::config::Settings;

/// Multiplicative weight per working pixel, row-major, never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalMask {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl PositionalMask {
    /// Compute the mask for a `width` x `height` working image.
    pub fn new(width: u32, height: u32, settings: &Settings) -> Self {
        let w = width as usize;
        let mut values = vec![0.0; w * height as usize];

        if w > 0 {
            values
                .par_chunks_mut(w)
                .enumerate()
                .for_each(|(y, row)| {
                    let yf = (y as f64 + 0.5) / height as f64;
                    for (x, value) in row.iter_mut().enumerate() {
                        let xf = (x as f64 + 0.5) / width as f64;
                        *value = weight_at(xf, yf, settings);
                    }
                });
        }

        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Weight at `(x, y)`.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// All weights, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Weight for a point given as fractions of the image size.
///
/// Distance from the centre lowers the weight, proximity to a thirds line
/// raises it, and points within `border_radius` of an edge fall off
/// quadratically.
pub fn weight_at(xf: f64, yf: f64, settings: &Settings) -> f64 {
    let px = (0.5 - xf).abs() * 2.0;
    let py = (0.5 - yf).abs() * 2.0;

    let edge_start = 1.0 - settings.border_radius;
    let dx = (px - edge_start).max(0.0);
    let dy = (py - edge_start).max(0.0);
    let falloff = -settings.border_penalty * (dx * dx + dy * dy);

    // 1.41 ~ sqrt(2): zero at the corners before any falloff
    let mut weight = 1.41 - (px * px + py * py).sqrt();
    weight += (weight + falloff + 0.5).max(0.0)
        * settings.rule_of_thirds_weight
        * (thirds(px) + thirds(py));

    (weight + falloff).max(0.0)
}

/// Peak of 1 where `x` sits on a thirds line (1/3 of the half-extent from
/// the centre), dropping to 0 within 1/16 of it.
pub fn thirds(x: f64) -> f64 {
    let t = (((x - 1.0 / 3.0 + 1.0) % 2.0) * 0.5 - 0.5) * 16.0;
    (1.0 - t * t).max(0.0)
}
