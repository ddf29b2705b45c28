//! Shared data models for content-aware crop selection.
//!
//! This crate provides Serde-serializable types for:
//! - Crop rectangles in pixel coordinates
//! - Target aspect ratios
//! - Caller-supplied boost regions
//! - Candidate scores and scored crops

pub mod aspect;
pub mod boost;
pub mod rect;
pub mod score;

// Re-export common types
pub use aspect::{AspectRatio, AspectRatioError};
pub use boost::BoostRegion;
pub use rect::CropRect;
pub use score::{Score, ScoredCrop};
