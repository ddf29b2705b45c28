use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rect::CropRect;

/// Composite score of one crop candidate.
///
/// The sub-scores are the importance captured inside the candidate per
/// signal; `penalty` is the weighted importance left outside it.
/// `total = detail + skin + saturation + boost - penalty`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Score {
    /// Edge/detail importance inside the candidate
    pub detail: f64,
    /// Skin-tone importance inside the candidate
    pub skin: f64,
    /// Saturation importance inside the candidate
    pub saturation: f64,
    /// Boost-region importance inside the candidate
    pub boost: f64,
    /// Weighted importance excluded by the candidate
    pub penalty: f64,
    /// Value used for ranking
    pub total: f64,
}

impl Score {
    /// Importance captured inside the candidate, all signals combined.
    pub fn inside(&self) -> f64 {
        self.detail + self.skin + self.saturation + self.boost
    }
}

/// A crop rectangle paired with its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredCrop {
    /// Candidate rectangle
    pub rect: CropRect,
    /// Score of the candidate
    pub score: Score,
}

impl ScoredCrop {
    /// Create a new scored crop.
    pub fn new(rect: CropRect, score: Score) -> Self {
        Self { rect, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_sums_signals() {
        let score = Score {
            detail: 1.0,
            skin: 2.0,
            saturation: 0.5,
            boost: 0.25,
            penalty: 1.5,
            total: 2.25,
        };
        assert_eq!(score.inside(), 3.75);
        assert_eq!(score.inside() - score.penalty, score.total);
    }
}
