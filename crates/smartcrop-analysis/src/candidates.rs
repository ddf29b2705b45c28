//! Candidate crop enumeration.
//!
//! Scales run from the largest crop of the target aspect ratio that fits
//! the working image down to the minimum scale. At each scale the crop
//! slides over a grid of offsets, x before y, with the flush right/bottom
//! offset appended so the image is always fully covered. The resulting
//! order is the tie-break order: largest scale, then smallest x, then
//! smallest y.
//!
//! The grid winner is then refined at single-pixel offsets within one grid
//! step of it, so the final position is not limited to grid multiples.

use smartcrop_models::{AspectRatio, CropRect};

use crate::config::Settings;
use crate::error::{CropError, CropResult};

/// Tolerance for accumulated error in `1.0 - i * step`.
const SCALE_EPSILON: f64 = 1e-9;

/// The crop sizes and offsets to evaluate over one working image.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePlan {
    frame_width: u32,
    frame_height: u32,
    step: u32,
    /// Distinct crop sizes, largest first
    sizes: Vec<(u32, u32)>,
}

impl CandidatePlan {
    /// Plan candidates for a `frame_width` x `frame_height` working image.
    ///
    /// `min_scale` bounds the smallest crop relative to the largest one.
    /// Fails with `ImageTooSmall` when the aspect ratio cannot fit a single
    /// non-empty crop.
    pub fn new(
        frame_width: u32,
        frame_height: u32,
        aspect: AspectRatio,
        min_scale: f64,
        settings: &Settings,
    ) -> CropResult<Self> {
        let too_small = || CropError::ImageTooSmall {
            working_width: frame_width,
            working_height: frame_height,
            target_width: aspect.width,
            target_height: aspect.height,
        };

        let (base_width, base_height) = aspect.fit_within(frame_width, frame_height);
        if base_width == 0 || base_height == 0 {
            return Err(too_small());
        }

        // Scale the constrained axis and derive the other from the ratio,
        // so every size stays within a pixel of the target aspect ratio
        let width_limited = base_width == frame_width;
        let mut sizes: Vec<(u32, u32)> = Vec::new();
        let mut i = 0u32;
        loop {
            let scale = 1.0 - i as f64 * settings.candidate_scale_step;
            if i > 0 && scale + SCALE_EPSILON < min_scale {
                break;
            }
            if scale <= 0.0 {
                break;
            }

            let (width, height) = if width_limited {
                let width = (base_width as f64 * scale + SCALE_EPSILON).floor() as u32;
                (width, scale_side(width, aspect.height, aspect.width))
            } else {
                let height = (base_height as f64 * scale + SCALE_EPSILON).floor() as u32;
                (scale_side(height, aspect.width, aspect.height), height)
            };
            if width > 0 && height > 0 && !sizes.contains(&(width, height)) {
                sizes.push((width, height));
            }
            i += 1;
        }

        if sizes.is_empty() {
            return Err(too_small());
        }

        Ok(Self {
            frame_width,
            frame_height,
            step: settings.candidate_step_size.max(1),
            sizes,
        })
    }

    /// Crop sizes in evaluation order.
    pub fn sizes(&self) -> &[(u32, u32)] {
        &self.sizes
    }

    /// Number of candidates [`generate`](Self::generate) will produce.
    pub fn len(&self) -> usize {
        self.sizes
            .iter()
            .map(|&(w, h)| {
                offsets(self.frame_width, w, self.step).len()
                    * offsets(self.frame_height, h, self.step).len()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every candidate, in enumeration order: scale, then x, then y.
    pub fn generate(&self) -> Vec<CropRect> {
        let mut candidates = Vec::with_capacity(self.len());

        for &(width, height) in &self.sizes {
            let xs = offsets(self.frame_width, width, self.step);
            let ys = offsets(self.frame_height, height, self.step);
            for &x in &xs {
                for &y in &ys {
                    candidates.push(CropRect::new(x, y, width, height));
                }
            }
        }

        candidates
    }

    /// Single-pixel offsets of `best`'s size within one grid step of it,
    /// clamped to the frame, x before y. Includes `best` itself.
    ///
    /// Empty when the grid step is already one pixel.
    pub fn refine(&self, best: &CropRect) -> Vec<CropRect> {
        if self.step <= 1 {
            return Vec::new();
        }

        let reach = self.step - 1;
        let around = |start: u32, size: u32, extent: u32| {
            let last = extent.saturating_sub(size);
            start.saturating_sub(reach).min(last)..=start.saturating_add(reach).min(last)
        };
        let xs = around(best.x, best.width, self.frame_width);
        let ys = around(best.y, best.height, self.frame_height);

        xs.flat_map(|x| {
            ys.clone()
                .map(move |y| CropRect::new(x, y, best.width, best.height))
        })
        .collect()
    }
}

/// Smallest candidate scale for a request.
///
/// Candidates are kept at least as large as the requested output when the
/// original image allows it, and never below `min_candidate_scale` of the
/// largest fitting crop.
pub fn minimum_scale(
    original_width: u32,
    original_height: u32,
    target_width: u32,
    target_height: u32,
    min_candidate_scale: f64,
) -> f64 {
    let fit = (original_width as f64 / target_width as f64)
        .min(original_height as f64 / target_height as f64);

    min_candidate_scale.max(1.0 / fit).min(1.0)
}

/// `side * numerator / denominator`, rounded down.
fn scale_side(side: u32, numerator: u32, denominator: u32) -> u32 {
    (side as u64 * numerator as u64 / denominator as u64) as u32
}

/// Grid offsets for a crop of `size` along an axis of `extent`, with the
/// flush offset appended when the grid misses it.
fn offsets(extent: u32, size: u32, step: u32) -> Vec<u32> {
    if size > extent {
        return Vec::new();
    }

    let last = extent - size;
    let mut positions: Vec<u32> = (0..=last).step_by(step as usize).collect();
    if positions.last() != Some(&last) {
        positions.push(last);
    }
    positions
}
