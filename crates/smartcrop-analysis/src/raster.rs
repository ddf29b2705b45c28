//! Decoded RGBA pixel buffers.

use image::{DynamicImage, RgbaImage};

use crate::error::{CropError, CropResult};

/// Samples per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A decoded image: 8-bit RGBA samples, row-major, no padding.
///
/// The buffer is never mutated by the pipeline; each stage that transforms
/// pixels produces a new `Image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    /// Wrap a raw buffer after checking its length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> CropResult<Self> {
        let image = Self::from_raw(width, height, data);
        image.validate()?;
        Ok(image)
    }

    /// Wrap a raw buffer without validation.
    ///
    /// The analysis entry points validate before reading pixels, so an
    /// inconsistent buffer surfaces as `UnsupportedImage` there.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Image filled with a single colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_fn(width, height, |_, _| rgba)
    }

    /// Image built pixel by pixel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA samples.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// RGB samples of one pixel.
    #[inline]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Check the buffer is usable: non-zero dimensions and a length of
    /// exactly `width * height * 4`.
    pub fn validate(&self) -> CropResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CropError::unsupported_image(format!(
                "image dimensions are zero ({}x{})",
                self.width, self.height
            )));
        }

        let expected = self.width as u64 * self.height as u64 * CHANNELS as u64;
        if self.data.len() as u64 != expected {
            return Err(CropError::unsupported_image(format!(
                "buffer holds {} bytes, {}x{} RGBA needs {}",
                self.data.len(),
                self.width,
                self.height,
                expected
            )));
        }

        Ok(())
    }

    /// Convert into an `image` crate buffer, if the length is consistent.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }
}

impl From<RgbaImage> for Image {
    fn from(buffer: RgbaImage) -> Self {
        let (width, height) = buffer.dimensions();
        Self::from_raw(width, height, buffer.into_raw())
    }
}

impl From<&DynamicImage> for Image {
    fn from(image: &DynamicImage) -> Self {
        Self::from(image.to_rgba8())
    }
}
