//! Downsampling to the working resolution.
//!
//! The only stage aware of original versus working pixel sizes: it records
//! the scale factor so rectangles can be mapped in both directions.

use image::{imageops, ImageBuffer, Rgba};
use smartcrop_models::CropRect;
use tracing::debug;

use crate::error::{CropError, CropResult};
use crate::raster::Image;

/// The image every later stage works on, plus its mapping to the original.
#[derive(Debug, Clone)]
pub struct WorkingImage {
    /// Downsampled (or untouched) pixels
    pub image: Image,
    /// Working pixels per original pixel (1.0 when not downsampled)
    pub scale: f64,
    /// Original image width
    pub original_width: u32,
    /// Original image height
    pub original_height: u32,
}

impl WorkingImage {
    /// True when the working image is smaller than the original.
    pub fn is_downsampled(&self) -> bool {
        self.scale < 1.0
    }

    /// Map an original-space rectangle onto the working image.
    ///
    /// Uses outward rounding so no covered pixel is lost, then clips to the
    /// working image. Returns `None` when nothing remains.
    pub fn to_working(&self, rect: &CropRect) -> Option<CropRect> {
        let s = self.scale;
        let x0 = (rect.x as f64 * s).floor() as u32;
        let y0 = (rect.y as f64 * s).floor() as u32;
        let x1 = (rect.right() as f64 * s).ceil() as u32;
        let y1 = (rect.bottom() as f64 * s).ceil() as u32;

        CropRect::from_corners((x0, y0), (x1, y1))
            .clip_to(self.image.width(), self.image.height())
    }

    /// Map a working-space rectangle back to original pixels.
    ///
    /// Coordinates are rounded to the nearest pixel; the size is capped to
    /// the original image and the origin shifted back inside it if the
    /// rounding pushed the far edge out of bounds.
    pub fn to_original(&self, rect: &CropRect) -> CropRect {
        let s = self.scale;
        let width = ((rect.width as f64 / s).round() as u32).clamp(1, self.original_width);
        let height = ((rect.height as f64 / s).round() as u32).clamp(1, self.original_height);
        let x = ((rect.x as f64 / s).round() as u32).min(self.original_width - width);
        let y = ((rect.y as f64 / s).round() as u32).min(self.original_height - height);

        CropRect::new(x, y, width, height)
    }
}

/// Working dimensions and scale for an image, without touching pixels.
///
/// The larger side becomes exactly `max_dimension` when it exceeds it; the
/// other side is rounded and never drops below one pixel.
pub fn working_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32, f64) {
    let larger = width.max(height);
    if larger <= max_dimension {
        return (width, height, 1.0);
    }

    let scale = max_dimension as f64 / larger as f64;
    let scaled = |side: u32| {
        if side == larger {
            max_dimension
        } else {
            ((side as f64 * scale).round() as u32).max(1)
        }
    };

    (scaled(width), scaled(height), scale)
}

/// Bring an image down to the working resolution.
///
/// Images already within `max_dimension` are passed through unchanged;
/// larger ones are area-averaged with `imageops::thumbnail`.
pub fn prepare(image: &Image, max_dimension: u32) -> CropResult<WorkingImage> {
    let (width, height) = image.dimensions();
    let (working_width, working_height, scale) =
        working_dimensions(width, height, max_dimension);

    let working = if scale < 1.0 {
        debug!(
            "Downsampling {}x{} to {}x{} (scale {:.4})",
            width, height, working_width, working_height, scale
        );
        let view = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(width, height, image.as_raw())
            .ok_or_else(|| {
                CropError::unsupported_image(format!(
                    "buffer of {} bytes does not match {}x{} RGBA",
                    image.as_raw().len(),
                    width,
                    height
                ))
            })?;
        Image::from(imageops::thumbnail(&view, working_width, working_height))
    } else {
        image.clone()
    };

    Ok(WorkingImage {
        image: working,
        scale,
        original_width: width,
        original_height: height,
    })
}
