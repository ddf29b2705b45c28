//! Error types for crop analysis.

use std::time::Duration;
use thiserror::Error;

/// Result type for crop analysis.
pub type CropResult<T> = Result<T, CropError>;

/// Errors that can occur while selecting a crop.
///
/// Every request-level error is raised during validation, before any pixel
/// is read.
#[derive(Debug, Error)]
pub enum CropError {
    #[error("Invalid target size {width}x{height}: both dimensions must be positive")]
    InvalidTargetSize { width: u32, height: u32 },

    #[error(
        "Image too small: {working_width}x{working_height} working image cannot hold a \
         {target_width}:{target_height} crop"
    )]
    ImageTooSmall {
        working_width: u32,
        working_height: u32,
        target_width: u32,
        target_height: u32,
    },

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid boost region: {0}")]
    InvalidBoostRegion(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CropError {
    /// Create an unsupported image error.
    pub fn unsupported_image(message: impl Into<String>) -> Self {
        Self::UnsupportedImage(message.into())
    }

    /// Create an invalid settings error.
    pub fn invalid_settings(message: impl Into<String>) -> Self {
        Self::InvalidSettings(message.into())
    }

    /// Create an invalid boost region error.
    pub fn invalid_boost(message: impl Into<String>) -> Self {
        Self::InvalidBoostRegion(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Short, stable name of the error kind, for metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidTargetSize { .. } => "invalid_target_size",
            Self::ImageTooSmall { .. } => "image_too_small",
            Self::UnsupportedImage(_) => "unsupported_image",
            Self::InvalidSettings(_) => "invalid_settings",
            Self::InvalidBoostRegion(_) => "invalid_boost_region",
            Self::Cancelled => "cancelled",
            Self::Timeout(_) => "timeout",
            Self::JsonParse(_) => "json_parse",
            Self::Internal(_) => "internal",
        }
    }

    /// True for errors caused by the request itself rather than by
    /// cancellation or an internal failure.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::InvalidTargetSize { .. }
                | Self::ImageTooSmall { .. }
                | Self::UnsupportedImage(_)
                | Self::InvalidSettings(_)
                | Self::InvalidBoostRegion(_)
                | Self::JsonParse(_)
        )
    }
}
