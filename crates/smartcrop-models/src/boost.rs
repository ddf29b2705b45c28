use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rect::CropRect;

/// Caller-supplied region whose importance is raised before scoring,
/// e.g. a face found by an external detector.
///
/// The rectangle is in original-image pixel coordinates. `weight` is added
/// to every pixel inside it, so it must be finite, non-negative and at most
/// [`BoostRegion::MAX_WEIGHT`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoostRegion {
    /// Boosted area in original-image coordinates
    pub rect: CropRect,
    /// Importance added per pixel
    pub weight: f64,
}

impl BoostRegion {
    /// Largest accepted weight. Keeps fixed-point importance sums over a
    /// working image far from `u64` overflow.
    pub const MAX_WEIGHT: f64 = 1.0e6;

    /// Create a new boost region.
    pub fn new(rect: CropRect, weight: f64) -> Self {
        Self { rect, weight }
    }

    /// True when the weight can be applied additively.
    pub fn has_valid_weight(&self) -> bool {
        self.weight.is_finite() && (0.0..=Self::MAX_WEIGHT).contains(&self.weight)
    }

    /// True when the rectangle's far edges fit in pixel coordinates.
    pub fn has_valid_rect(&self) -> bool {
        self.rect.has_representable_corners()
    }
}
