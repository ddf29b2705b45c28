//! Target aspect ratio for crop selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors when building an aspect ratio.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AspectRatioError {
    #[error("aspect ratio components must be positive, got {width}x{height}")]
    ZeroComponent { width: u32, height: u32 },

    #[error("invalid aspect ratio '{0}', expected W:H or WxH")]
    Malformed(String),
}

/// Requested output shape.
///
/// Only the ratio matters for the search; the absolute numbers also act as
/// the smallest crop worth producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AspectRatio {
    /// Width component
    pub width: u32,
    /// Height component
    pub height: u32,
}

impl AspectRatio {
    /// Portrait 9:16
    pub const PORTRAIT: AspectRatio = AspectRatio { width: 9, height: 16 };

    /// Square 1:1
    pub const SQUARE: AspectRatio = AspectRatio { width: 1, height: 1 };

    /// Landscape 16:9
    pub const LANDSCAPE: AspectRatio = AspectRatio { width: 16, height: 9 };

    /// Create an aspect ratio, rejecting zero components.
    pub fn new(width: u32, height: u32) -> Result<Self, AspectRatioError> {
        if width == 0 || height == 0 {
            return Err(AspectRatioError::ZeroComponent { width, height });
        }
        Ok(Self { width, height })
    }

    /// Returns width/height as float.
    pub fn ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Largest `(width, height)` of this ratio that fits a `frame_width` x
    /// `frame_height` frame.
    ///
    /// Integer arithmetic keeps the result exact: the constrained side is
    /// the full frame and the other side is floored.
    pub fn fit_within(&self, frame_width: u32, frame_height: u32) -> (u32, u32) {
        let (fw, fh) = (frame_width as u64, frame_height as u64);
        let (tw, th) = (self.width as u64, self.height as u64);

        if fw * th > fh * tw {
            // Frame is wider than the target: height-constrained
            ((fh * tw / th) as u32, frame_height)
        } else {
            // Frame is narrower (or equal): width-constrained
            (frame_width, (fw * th / tw) as u32)
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(':')
            .or_else(|| s.split_once('x'))
            .ok_or_else(|| AspectRatioError::Malformed(s.to_string()))?;

        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|_| AspectRatioError::Malformed(s.to_string()))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|_| AspectRatioError::Malformed(s.to_string()))?;

        Self::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero() {
        assert_eq!(
            AspectRatio::new(0, 250),
            Err(AspectRatioError::ZeroComponent {
                width: 0,
                height: 250
            })
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!("16:9".parse::<AspectRatio>().unwrap(), AspectRatio::LANDSCAPE);
        assert_eq!("250x250".parse::<AspectRatio>().unwrap().ratio(), 1.0);
        assert!("16/9".parse::<AspectRatio>().is_err());
        assert!("0:9".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_fit_within_wide_frame() {
        // 640x427 frame, square target: height-constrained
        assert_eq!(AspectRatio::SQUARE.fit_within(640, 427), (427, 427));
        // 9:16 out of 1920x1080
        assert_eq!(AspectRatio::PORTRAIT.fit_within(1920, 1080), (607, 1080));
    }

    #[test]
    fn test_fit_within_tall_frame() {
        assert_eq!(AspectRatio::LANDSCAPE.fit_within(300, 800), (300, 168));
        assert_eq!(AspectRatio::SQUARE.fit_within(300, 300), (300, 300));
    }
}
