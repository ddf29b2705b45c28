use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An integer rectangle in pixel coordinates, origin at the top-left corner.
///
/// `right()` and `bottom()` are exclusive, so a rectangle at `(59, 0)` with a
/// size of `427x427` spans the corners `(59, 0)` and `(486, 427)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub struct CropRect {
    /// Left edge x-coordinate
    pub x: u32,
    /// Top edge y-coordinate
    pub y: u32,
    /// Rectangle width
    pub width: u32,
    /// Rectangle height
    pub height: u32,
}

impl CropRect {
    /// Create a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from its two corners (`max` exclusive).
    pub fn from_corners(min: (u32, u32), max: (u32, u32)) -> Self {
        Self {
            x: min.0,
            y: min.1,
            width: max.0.saturating_sub(min.0),
            height: max.1.saturating_sub(min.1),
        }
    }

    /// Right edge x-coordinate (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge y-coordinate (exclusive), saturating at `u32::MAX`.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// True when both far edges fit in `u32` without saturating.
    pub fn has_representable_corners(&self) -> bool {
        self.x.checked_add(self.width).is_some() && self.y.checked_add(self.height).is_some()
    }

    /// True when the rectangle covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a pixel lies inside the rectangle.
    #[inline]
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &CropRect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if the rectangle lies inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Overlapping part of two rectangles, if any.
    pub fn intersection(&self, other: &CropRect) -> Option<CropRect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(CropRect::from_corners((x1, y1), (x2, y2)))
    }

    /// Clip the rectangle to a `width` x `height` image.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<CropRect> {
        self.intersection(&CropRect::new(0, 0, width, height))
    }
}

impl std::fmt::Display for CropRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.x,
            self.y,
            self.right(),
            self.bottom()
        )
    }
}
