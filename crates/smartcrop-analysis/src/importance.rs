//! Importance map: weighted signals plus boosts, shaped by the positional
//! mask.
//!
//! The map keeps one channel per contribution so the scorer can report
//! sub-scores; the importance of a pixel is the sum of its channels.

use smartcrop_models::CropRect;
use tracing::trace;

use crate::composition::PositionalMask;
use crate::config::Settings;
use crate::signals::Signals;

/// One contribution to the importance map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Detail,
    Skin,
    Saturation,
    Boost,
}

impl Channel {
    /// Every channel, in sub-score order.
    pub const ALL: [Channel; 4] = [
        Channel::Detail,
        Channel::Skin,
        Channel::Saturation,
        Channel::Boost,
    ];
}

/// A boost already mapped to working-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingBoost {
    pub rect: CropRect,
    pub weight: f64,
}

/// Per-pixel importance over the working image. Read-only once built;
/// every value is non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceMap {
    width: u32,
    height: u32,
    detail: Vec<f64>,
    skin: Vec<f64>,
    saturation: Vec<f64>,
    boost: Vec<f64>,
}

impl ImportanceMap {
    /// Combine detector outputs and boosts, then apply the positional mask.
    ///
    /// Boosts are added in the order given; addition makes the result
    /// independent of that order.
    pub fn build(
        signals: &Signals,
        boosts: &[WorkingBoost],
        mask: &PositionalMask,
        settings: &Settings,
    ) -> Self {
        let width = mask.width();
        let height = mask.height();
        let weights = mask.values();

        let weighted = |values: &[f64], factor: f64| -> Vec<f64> {
            values
                .iter()
                .zip(weights)
                .map(|(v, m)| v * factor * m)
                .collect()
        };

        let detail = weighted(signals.edge.values(), settings.edge_weight);
        let skin = weighted(signals.skin.values(), settings.skin_weight);
        let saturation = weighted(signals.saturation.values(), settings.saturation_weight);

        let mut boost = vec![0.0; weights.len()];
        for region in boosts {
            trace!("Applying boost {} (weight {})", region.rect, region.weight);
            for y in region.rect.y..region.rect.bottom().min(height) {
                let row = y as usize * width as usize;
                for x in region.rect.x..region.rect.right().min(width) {
                    boost[row + x as usize] += region.weight;
                }
            }
        }
        for (b, m) in boost.iter_mut().zip(weights) {
            *b *= m;
        }

        Self {
            width,
            height,
            detail,
            skin,
            saturation,
            boost,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Values of one channel, row-major.
    pub fn channel(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::Detail => &self.detail,
            Channel::Skin => &self.skin,
            Channel::Saturation => &self.saturation,
            Channel::Boost => &self.boost,
        }
    }

    /// Total importance at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> f64 {
        let i = y as usize * self.width as usize + x as usize;
        self.detail[i] + self.skin[i] + self.saturation[i] + self.boost[i]
    }

    /// Largest total importance of any pixel.
    pub fn max_value(&self) -> f64 {
        (0..self.detail.len())
            .map(|i| self.detail[i] + self.skin[i] + self.saturation[i] + self.boost[i])
            .fold(0.0, f64::max)
    }
}
