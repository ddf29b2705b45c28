//! The crop analysis pipeline, from validation to the mapped-back crop.

use std::time::{Duration, Instant};

use smartcrop_models::{AspectRatio, BoostRegion, CropRect, ScoredCrop};
use tokio::sync::watch;
use tracing::debug;

use crate::cancel::Interrupt;
use crate::candidates::{minimum_scale, CandidatePlan};
use crate::composition::PositionalMask;
use crate::config::Settings;
use crate::error::{CropError, CropResult};
use crate::importance::{ImportanceMap, WorkingBoost};
use crate::metrics;
use crate::preprocess::{self, working_dimensions};
use crate::raster::Image;
use crate::scorer::Scorer;
use crate::selector::select_best;
use crate::signals::extract_all;

/// Everything an analysis found, for callers that want more than the
/// rectangle.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Winning crop in original-image coordinates, with its sub-scores
    pub crop: ScoredCrop,
    /// The same crop in working-image coordinates
    pub working_crop: CropRect,
    /// Working pixels per original pixel
    pub scale: f64,
    /// Number of candidates scored
    pub candidates: usize,
    /// Importance map the candidates were scored against
    pub importance: ImportanceMap,
}

/// Validated request, ready to run.
struct Request {
    plan: CandidatePlan,
}

/// Finds the best crop of an image for a target size.
///
/// Cheap to clone; holds configuration only. Every call builds its
/// buffers from scratch and shares nothing with other calls.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    settings: Settings,
    boosts: Vec<BoostRegion>,
    cancel_rx: Option<watch::Receiver<bool>>,
    timeout: Option<Duration>,
}

impl Analyzer {
    /// Create an analyzer with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Settings in use.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Boost regions in use.
    pub fn boosts(&self) -> &[BoostRegion] {
        &self.boosts
    }

    /// Add a boost region (original-image coordinates).
    pub fn with_boost(mut self, boost: BoostRegion) -> Self {
        self.boosts.push(boost);
        self
    }

    /// Add several boost regions, applied in the order given.
    pub fn with_boosts(mut self, boosts: impl IntoIterator<Item = BoostRegion>) -> Self {
        self.boosts.extend(boosts);
        self
    }

    /// Set cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set timeout, counted from the start of each analysis.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Best crop of `image` for a `target_width` x `target_height` output,
    /// in original-image pixel coordinates.
    pub fn find_best_crop(
        &self,
        image: &Image,
        target_width: u32,
        target_height: u32,
    ) -> CropResult<CropRect> {
        self.analyze(image, target_width, target_height)
            .map(|analysis| analysis.crop.rect)
    }

    /// Run the analysis on tokio's blocking pool.
    pub async fn find_best_crop_async(
        &self,
        image: Image,
        target_width: u32,
        target_height: u32,
    ) -> CropResult<CropRect> {
        let analyzer = self.clone();
        tokio::task::spawn_blocking(move || {
            analyzer.find_best_crop(&image, target_width, target_height)
        })
        .await
        .map_err(|e| CropError::internal(format!("analysis task failed: {}", e)))?
    }

    /// Full analysis: winning crop, its scores, and the importance map.
    pub fn analyze(
        &self,
        image: &Image,
        target_width: u32,
        target_height: u32,
    ) -> CropResult<Analysis> {
        let start = Instant::now();
        let result = self.run(image, target_width, target_height);

        let elapsed = start.elapsed().as_secs_f64();
        match &result {
            Ok(analysis) => {
                metrics::record_analysis("ok", analysis.scale < 1.0, elapsed);
                metrics::record_candidates(analysis.candidates);
            }
            Err(e) => metrics::record_analysis(e.kind(), false, elapsed),
        }

        result
    }

    fn run(&self, image: &Image, target_width: u32, target_height: u32) -> CropResult<Analysis> {
        let request = self.validate(image, target_width, target_height)?;
        let interrupt = Interrupt::new(self.cancel_rx.clone(), self.timeout);
        let settings = &self.settings;

        let stage = Instant::now();
        let working = preprocess::prepare(image, settings.max_working_dimension)?;
        let (width, height) = working.image.dimensions();
        debug!(
            "Working image {}x{} (scale {:.4}) in {:?}",
            width,
            height,
            working.scale,
            stage.elapsed()
        );
        interrupt.check()?;

        let boosts: Vec<WorkingBoost> = self
            .boosts
            .iter()
            .filter_map(|boost| match working.to_working(&boost.rect) {
                Some(rect) => Some(WorkingBoost {
                    rect,
                    weight: boost.weight,
                }),
                None => {
                    debug!("Ignoring boost {} outside the image", boost.rect);
                    None
                }
            })
            .collect();

        let signals = extract_all(&working.image, settings);
        interrupt.check()?;

        let stage = Instant::now();
        let mask = PositionalMask::new(width, height, settings);
        let importance = ImportanceMap::build(&signals, &boosts, &mask, settings);
        let scorer = Scorer::new(&importance, settings)?;
        debug!("Built importance map in {:?}", stage.elapsed());
        interrupt.check()?;

        let stage = Instant::now();
        let candidates = request.plan.generate();
        let grid_best = select_best(&scorer, &candidates, &interrupt)?;
        debug!(
            "Scored {} candidates in {:?}, best #{} {} (total {:.4})",
            candidates.len(),
            stage.elapsed(),
            grid_best.index,
            grid_best.crop.rect,
            grid_best.crop.score.total
        );

        let refined = request.plan.refine(&grid_best.crop.rect);
        let best = if refined.is_empty() {
            grid_best
        } else {
            let best = select_best(&scorer, &refined, &interrupt)?;
            debug!(
                "Refined {} -> {} over {} offsets",
                grid_best.crop.rect,
                best.crop.rect,
                refined.len()
            );
            best
        };

        let rect = working.to_original(&best.crop.rect);

        Ok(Analysis {
            crop: ScoredCrop::new(rect, best.crop.score),
            working_crop: best.crop.rect,
            scale: working.scale,
            candidates: candidates.len() + refined.len(),
            importance,
        })
    }

    /// Check the whole request before any pixel is read.
    ///
    /// Order: target size, settings, image buffer, boosts, then whether the
    /// working image can hold a crop of the target ratio at all.
    fn validate(&self, image: &Image, target_width: u32, target_height: u32) -> CropResult<Request> {
        let aspect = AspectRatio::new(target_width, target_height).map_err(|_| {
            CropError::InvalidTargetSize {
                width: target_width,
                height: target_height,
            }
        })?;

        self.settings.validate()?;
        image.validate()?;

        for (i, boost) in self.boosts.iter().enumerate() {
            if !boost.has_valid_weight() {
                return Err(CropError::invalid_boost(format!(
                    "boost #{} at {} has weight {}, expected a value in [0, {}]",
                    i,
                    boost.rect,
                    boost.weight,
                    BoostRegion::MAX_WEIGHT
                )));
            }
            if !boost.has_valid_rect() {
                return Err(CropError::invalid_boost(format!(
                    "boost #{} at ({}, {}) size {}x{} extends past the pixel coordinate range",
                    i, boost.rect.x, boost.rect.y, boost.rect.width, boost.rect.height
                )));
            }
        }

        let (width, height) = image.dimensions();
        let (working_width, working_height, _) =
            working_dimensions(width, height, self.settings.max_working_dimension);
        let min_scale = minimum_scale(
            width,
            height,
            target_width,
            target_height,
            self.settings.min_candidate_scale,
        );
        let plan = CandidatePlan::new(
            working_width,
            working_height,
            aspect,
            min_scale,
            &self.settings,
        )?;

        Ok(Request { plan })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> Image {
        Image::filled(width, height, [128, 128, 128, 255])
    }

    #[test]
    fn test_square_crop_of_landscape() {
        let rect = Analyzer::default()
            .find_best_crop(&gray(640, 427), 250, 250)
            .unwrap();

        assert_eq!((rect.width, rect.height), (427, 427));
        assert_eq!(rect.y, 0);
        assert!(rect.fits_within(640, 427));
    }

    #[test]
    fn test_analysis_reports_working_space() {
        let analysis = Analyzer::default()
            .analyze(&gray(800, 400), 1, 1)
            .unwrap();

        assert_eq!(analysis.scale, 0.5);
        assert_eq!(analysis.importance.width(), 400);
        assert_eq!(analysis.importance.height(), 200);
        assert_eq!(analysis.working_crop.width * 2, analysis.crop.rect.width);
        assert!(analysis.candidates > 0);
    }

    #[test]
    fn test_invalid_boost_weight() {
        let analyzer = Analyzer::default()
            .with_boost(BoostRegion::new(CropRect::new(0, 0, 10, 10), f64::NAN));
        assert!(matches!(
            analyzer.find_best_crop(&gray(50, 50), 1, 1),
            Err(CropError::InvalidBoostRegion(_))
        ));
    }

    #[test]
    fn test_huge_boost_weight_rejected() {
        let analyzer = Analyzer::default()
            .with_boost(BoostRegion::new(CropRect::new(0, 0, 400, 300), 1.0e12));
        assert!(matches!(
            analyzer.find_best_crop(&gray(400, 300), 1, 1),
            Err(CropError::InvalidBoostRegion(_))
        ));
    }

    #[test]
    fn test_boost_rect_overflowing_coordinates_rejected() {
        let analyzer = Analyzer::default()
            .with_boost(BoostRegion::new(CropRect::new(u32::MAX - 5, 0, 10, 10), 1.0));
        assert!(matches!(
            analyzer.find_best_crop(&gray(50, 50), 1, 1),
            Err(CropError::InvalidBoostRegion(_))
        ));
    }

    #[test]
    fn test_boost_at_weight_limit_is_scored() {
        let analysis = Analyzer::default()
            .with_boost(BoostRegion::new(
                CropRect::new(0, 0, 400, 300),
                BoostRegion::MAX_WEIGHT,
            ))
            .analyze(&gray(400, 300), 1, 1)
            .unwrap();
        assert!(analysis.crop.score.boost > 0.0);
    }

    #[test]
    fn test_boost_outside_image_is_ignored() {
        let plain = Analyzer::default().find_best_crop(&gray(200, 100), 1, 1).unwrap();
        let boosted = Analyzer::default()
            .with_boost(BoostRegion::new(CropRect::new(500, 500, 10, 10), 5.0))
            .find_best_crop(&gray(200, 100), 1, 1)
            .unwrap();
        assert_eq!(plain, boosted);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let analyzer = Analyzer::new(Settings {
            edge_weight: f64::INFINITY,
            ..Default::default()
        });
        assert!(matches!(
            analyzer.find_best_crop(&gray(20, 20), 1, 1),
            Err(CropError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let result = Analyzer::default()
            .with_cancel(rx)
            .find_best_crop(&gray(100, 100), 1, 1);
        assert!(matches!(result, Err(CropError::Cancelled)));
    }

    #[test]
    fn test_zero_timeout() {
        let result = Analyzer::default()
            .with_timeout(Duration::ZERO)
            .find_best_crop(&gray(100, 100), 1, 1);
        assert!(matches!(result, Err(CropError::Timeout(_))));
    }
}
