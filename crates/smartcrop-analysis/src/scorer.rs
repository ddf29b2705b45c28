//! Candidate scoring against the importance map.
//!
//! Each channel gets its own summed-area table, so a candidate costs a
//! handful of lookups regardless of its size. The inside sum rewards what a
//! crop keeps; detail, skin and saturation left outside are charged at
//! `outside_importance_weight`. Boosts only reward inclusion, so adding a
//! boost never lowers any candidate's score.

use smartcrop_models::{CropRect, Score};

use crate::config::Settings;
use crate::error::{CropError, CropResult};
use crate::importance::{Channel, ImportanceMap};
use crate::integral::{dequantize, SummedAreaTable};

/// Scores candidate rectangles over one importance map.
#[derive(Debug, Clone)]
pub struct Scorer {
    detail: SummedAreaTable,
    skin: SummedAreaTable,
    saturation: SummedAreaTable,
    boost: SummedAreaTable,
    /// Fixed-point total of the penalised channels over the whole map
    penalised_total: u64,
    outside_weight: f64,
}

impl Scorer {
    /// Build the summed-area tables for `map`.
    ///
    /// Fails when the map's total importance cannot be summed exactly, which
    /// also guarantees no candidate's sums can overflow.
    pub fn new(map: &ImportanceMap, settings: &Settings) -> CropResult<Self> {
        let (width, height) = (map.width(), map.height());

        let table = |channel: Channel| SummedAreaTable::new(width, height, map.channel(channel));
        let ((detail, skin), (saturation, boost)) = rayon::join(
            || rayon::join(|| table(Channel::Detail), || table(Channel::Skin)),
            || rayon::join(|| table(Channel::Saturation), || table(Channel::Boost)),
        );
        let (detail, skin, saturation, boost) = (detail?, skin?, saturation?, boost?);

        let penalised_total = detail
            .total()
            .checked_add(skin.total())
            .and_then(|sum| sum.checked_add(saturation.total()))
            .filter(|sum| sum.checked_add(boost.total()).is_some())
            .ok_or_else(|| CropError::internal("importance sum overflows fixed-point range"))?;

        Ok(Self {
            detail,
            skin,
            saturation,
            boost,
            penalised_total,
            outside_weight: settings.outside_importance_weight,
        })
    }

    /// Score one candidate. `rect` must lie within the map.
    pub fn score(&self, rect: &CropRect) -> Score {
        let detail = self.detail.sum(rect);
        let skin = self.skin.sum(rect);
        let saturation = self.saturation.sum(rect);
        let boost = self.boost.sum(rect);

        let penalised_inside = detail + skin + saturation;
        let outside = self.penalised_total - penalised_inside;
        let penalty = self.outside_weight * dequantize(outside);

        Score {
            detail: dequantize(detail),
            skin: dequantize(skin),
            saturation: dequantize(saturation),
            boost: dequantize(boost),
            penalty,
            total: dequantize(penalised_inside + boost) - penalty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::PositionalMask;
    use crate::importance::WorkingBoost;
    use crate::raster::Image;
    use crate::signals::extract_all;

    fn scorer_for(image: &Image, boosts: &[WorkingBoost]) -> Scorer {
        let settings = Settings::default();
        let signals = extract_all(image, &settings);
        let mask = PositionalMask::new(image.width(), image.height(), &settings);
        let map = ImportanceMap::build(&signals, boosts, &mask, &settings);
        Scorer::new(&map, &settings).unwrap()
    }

    fn red_block() -> Image {
        Image::from_fn(64, 48, |x, y| {
            if (36..48).contains(&x) && (18..30).contains(&y) {
                [220, 40, 40, 255]
            } else {
                [128, 128, 128, 255]
            }
        })
    }

    #[test]
    fn test_covering_salient_block_scores_higher() {
        let scorer = scorer_for(&red_block(), &[]);

        let covering = scorer.score(&CropRect::new(24, 8, 32, 32));
        let missing = scorer.score(&CropRect::new(0, 8, 32, 32));

        assert!(covering.total > missing.total);
        assert!(covering.saturation > 0.0);
        assert_eq!(missing.saturation, 0.0);
        assert!(missing.penalty > covering.penalty);
    }

    #[test]
    fn test_total_is_inside_minus_penalty() {
        let scorer = scorer_for(&red_block(), &[]);
        let score = scorer.score(&CropRect::new(16, 0, 48, 48));
        assert!((score.total - (score.inside() - score.penalty)).abs() < 1e-9);
    }

    #[test]
    fn test_full_frame_has_no_penalty() {
        let scorer = scorer_for(&red_block(), &[]);
        assert_eq!(scorer.score(&CropRect::new(0, 0, 64, 48)).penalty, 0.0);
    }

    #[test]
    fn test_oversized_boost_fails_instead_of_wrapping() {
        let settings = Settings::default();
        let image = red_block();
        let signals = extract_all(&image, &settings);
        let mask = PositionalMask::new(64, 48, &settings);
        let boosts = [WorkingBoost {
            rect: CropRect::new(0, 0, 64, 48),
            weight: 1.0e12,
        }];
        let map = ImportanceMap::build(&signals, &boosts, &mask, &settings);

        assert!(matches!(
            Scorer::new(&map, &settings),
            Err(CropError::Internal(_))
        ));
    }

    #[test]
    fn test_boost_never_lowers_score() {
        let image = red_block();
        let plain = scorer_for(&image, &[]);
        let boosted = scorer_for(
            &image,
            &[WorkingBoost {
                rect: CropRect::new(4, 10, 20, 20),
                weight: 2.0,
            }],
        );

        for rect in [
            CropRect::new(0, 8, 32, 32),
            CropRect::new(16, 8, 32, 32),
            CropRect::new(32, 16, 32, 32),
        ] {
            assert!(boosted.score(&rect).total >= plain.score(&rect).total);
        }
        assert!(
            boosted.score(&CropRect::new(0, 8, 32, 32)).total
                > plain.score(&CropRect::new(0, 8, 32, 32)).total
        );
    }
}
