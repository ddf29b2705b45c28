//! Visualisation of an analysis, for tuning and bug reports.
//!
//! Rendering only; encoding and writing the result is up to the caller.

use image::{Rgb, RgbImage};
use smartcrop_models::CropRect;

use crate::importance::{Channel, ImportanceMap};

/// Render the importance map: red is skin, green is detail, blue is
/// saturation, and boosted pixels are lifted towards white.
///
/// Channels share one normalisation (the brightest pixel's total), so
/// relative strengths are preserved.
pub fn render_importance(map: &ImportanceMap) -> RgbImage {
    let peak = map.max_value();
    let scale = if peak > 0.0 { 255.0 / peak } else { 0.0 };
    let to_u8 = |v: f64| (v * scale).round().clamp(0.0, 255.0) as u8;

    let detail = map.channel(Channel::Detail);
    let skin = map.channel(Channel::Skin);
    let saturation = map.channel(Channel::Saturation);
    let boost = map.channel(Channel::Boost);
    let width = map.width() as usize;

    RgbImage::from_fn(map.width(), map.height(), |x, y| {
        let i = y as usize * width + x as usize;
        let lift = to_u8(boost[i]);
        Rgb([
            to_u8(skin[i]).saturating_add(lift),
            to_u8(detail[i]).saturating_add(lift),
            to_u8(saturation[i]).saturating_add(lift),
        ])
    })
}

/// Outline `rect` on `canvas` with a one-pixel border, clipped to the
/// canvas.
pub fn draw_crop(canvas: &mut RgbImage, rect: &CropRect, color: [u8; 3]) {
    let Some(rect) = rect.clip_to(canvas.width(), canvas.height()) else {
        return;
    };
    let pixel = Rgb(color);
    let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);

    for x in rect.x..=right {
        canvas.put_pixel(x, rect.y, pixel);
        canvas.put_pixel(x, bottom, pixel);
    }
    for y in rect.y..=bottom {
        canvas.put_pixel(rect.x, y, pixel);
        canvas.put_pixel(right, y, pixel);
    }
}
