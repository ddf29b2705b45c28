//! Summed-area tables over fixed-point importance.
//!
//! Values are quantised to multiples of 2^-16 and summed as `u64`, so the
//! sum over a rectangle is exact: two rectangles covering equal values get
//! bit-identical sums regardless of where they sit.

use smartcrop_models::CropRect;

use crate::error::{CropError, CropResult};

/// Fixed-point units per unit of importance.
pub const FIXED_POINT_ONE: f64 = 65536.0;

/// Quantise a non-negative value to fixed point.
#[inline]
pub fn quantize(value: f64) -> u64 {
    (value * FIXED_POINT_ONE).round().max(0.0) as u64
}

/// Convert a fixed-point sum back to importance units.
#[inline]
pub fn dequantize(sum: u64) -> f64 {
    sum as f64 / FIXED_POINT_ONE
}

/// Summed-area table with a zero guard row and column.
#[derive(Debug, Clone)]
pub struct SummedAreaTable {
    width: u32,
    height: u32,
    /// `(width + 1) * (height + 1)` prefix sums
    sums: Vec<u64>,
}

impl SummedAreaTable {
    /// Build the table for row-major `values` of a `width` x `height` grid.
    ///
    /// Fails when the fixed-point total does not fit in `u64`.
    pub fn new(width: u32, height: u32, values: &[f64]) -> CropResult<Self> {
        let w = width as usize;
        let stride = w + 1;
        let mut sums = vec![0u64; stride * (height as usize + 1)];
        let overflow = || CropError::internal("importance sum overflows fixed-point range");

        for (y, row) in values.chunks_exact(w.max(1)).take(height as usize).enumerate() {
            let mut running = 0u64;
            let above = y * stride;
            let here = (y + 1) * stride;
            for (x, &value) in row.iter().enumerate() {
                running = running.checked_add(quantize(value)).ok_or_else(overflow)?;
                sums[here + x + 1] = sums[above + x + 1]
                    .checked_add(running)
                    .ok_or_else(overflow)?;
            }
        }

        Ok(Self {
            width,
            height,
            sums,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn at(&self, x: u32, y: u32) -> u64 {
        self.sums[y as usize * (self.width as usize + 1) + x as usize]
    }

    /// Fixed-point sum of the values inside `rect`, which must lie within
    /// the grid.
    #[inline]
    pub fn sum(&self, rect: &CropRect) -> u64 {
        let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.at(x1, y1) + self.at(x0, y0) - self.at(x0, y1) - self.at(x1, y0)
    }

    /// Fixed-point sum of the whole grid.
    pub fn total(&self) -> u64 {
        self.at(self.width, self.height)
    }
}
