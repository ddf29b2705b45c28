#![deny(unreachable_patterns)]
//! Content-aware crop selection for thumbnail pipelines.
//!
//! This crate provides:
//! - Area-averaging downsampling to a bounded working resolution
//! - Edge, skin-tone and saturation detectors run in parallel
//! - An importance map shaped by a rule-of-thirds positional mask
//! - Grid candidate scoring with summed-area tables, refined to single pixels
//! - Deterministic selection, with cancellation and timeouts for services
//!
//! # Architecture
//!
//! ```text
//! Decoded Image
//!     │
//!     ▼
//! ┌─────────────────┐
//! │  Preprocessor   │ ← Downsample to max_working_dimension
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Detectors    │ ← Edge / skin / saturation (rayon::join)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Importance Map  │ ← Weights + boosts, then positional mask
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Candidates    │ ← Scales x grid offsets, then 1px refinement
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Scorer/Selector │ ← Inside - weighted outside, stable max
//! └────────┬────────┘
//!          │
//!          ▼
//!    CropRect (original pixels)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use smartcrop_analysis::{find_best_crop, Image};
//!
//! let decoded = image::open("photo.jpg").unwrap();
//! let rect = find_best_crop(&Image::from(&decoded), 250, 250, None).unwrap();
//! println!("crop {}", rect);
//! ```

pub mod analyzer;
pub mod cancel;
pub mod candidates;
pub mod composition;
pub mod config;
pub mod debug;
pub mod error;
pub mod importance;
pub mod integral;
pub mod metrics;
pub mod preprocess;
mod raster;
pub mod scorer;
pub mod selector;
pub mod signals;

#[cfg(test)]
mod tests;

pub use analyzer::{Analysis, Analyzer};
pub use config::Settings;
pub use error::{CropError, CropResult};
pub use importance::{Channel, ImportanceMap};
pub use raster::{Image, CHANNELS};

pub use smartcrop_models::{AspectRatio, BoostRegion, CropRect, Score, ScoredCrop};

/// Best crop of `image` for a `target_width` x `target_height` output.
///
/// Only the ratio of the target size steers the search, and its magnitude
/// sets the smallest candidate worth considering. `None` uses the default
/// settings. The result is in original-image pixel coordinates.
pub fn find_best_crop(
    image: &Image,
    target_width: u32,
    target_height: u32,
    settings: Option<&Settings>,
) -> CropResult<CropRect> {
    Analyzer::new(settings.cloned().unwrap_or_default()).find_best_crop(
        image,
        target_width,
        target_height,
    )
}
