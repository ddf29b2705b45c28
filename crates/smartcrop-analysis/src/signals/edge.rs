//! Local-contrast edge detection.
//!
//! A Laplacian-style kernel on luminance: each pixel against its four
//! neighbours at `radius` pixels. Neighbour coordinates are clamped into the
//! image, so border pixels compare against themselves rather than reading
//! out of bounds.

use rayon::prelude::*;

use super::{luminance, SignalMap};
use crate::raster::{Image, CHANNELS};

/// Edge energy per pixel, in `[0, 1]`.
pub fn detect(image: &Image, radius: u32) -> SignalMap {
    let (width, height) = image.dimensions();
    let w = width as usize;
    let h = height as usize;
    let r = radius.max(1) as usize;

    let lum: Vec<f64> = image
        .as_raw()
        .chunks_exact(CHANNELS)
        .map(|px| luminance([px[0], px[1], px[2]]))
        .collect();

    let mut values = vec![0.0; w * h];
    if w == 0 {
        return SignalMap::from_values(width, height, values);
    }

    values
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            let up = y.saturating_sub(r) * w;
            let down = (y + r).min(h - 1) * w;
            let here = y * w;

            for (x, value) in row.iter_mut().enumerate() {
                let left = x.saturating_sub(r);
                let right = (x + r).min(w - 1);

                let contrast = 4.0 * lum[here + x]
                    - lum[up + x]
                    - lum[down + x]
                    - lum[here + left]
                    - lum[here + right];

                *value = contrast.clamp(0.0, 255.0) / 255.0;
            }
        });

    SignalMap::from_values(width, height, values)
}
