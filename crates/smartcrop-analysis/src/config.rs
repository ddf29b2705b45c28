//! Configuration for crop analysis.
//!
//! Every field has a default, and `#[serde(default)]` lets a document
//! override any subset of them.

use serde::{Deserialize, Serialize};

use crate::error::{CropError, CropResult};

/// Settings fixed for one crop analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Signal Weights ===
    /// Weight of edge/detail energy in the importance map (default: 0.2)
    pub edge_weight: f64,

    /// Weight of skin-tone likelihood in the importance map (default: 1.8)
    pub skin_weight: f64,

    /// Weight of saturation in the importance map (default: 0.3)
    pub saturation_weight: f64,

    // === Composition ===
    /// Scale of the penalty for importance left outside a candidate (default: 0.5)
    pub outside_importance_weight: f64,

    /// Strength of the rule-of-thirds boost in the positional mask (default: 1.2)
    pub rule_of_thirds_weight: f64,

    /// Distance from the border, as a fraction of the half-extent, where
    /// the border falloff starts (default: 0.4)
    pub border_radius: f64,

    /// Strength of the border falloff (default: 20.0)
    pub border_penalty: f64,

    // === Edge Detection ===
    /// Neighbour offset of the edge kernel in working pixels (default: 1)
    pub edge_radius: u32,

    // === Skin Detection ===
    /// Reference skin colour as an RGB direction, compared against unit-length
    /// pixel colours; not normalised itself (default: [0.78, 0.57, 0.44])
    pub skin_color: [f64; 3],

    /// Minimum skin likelihood before a pixel counts (default: 0.8)
    pub skin_threshold: f64,

    /// Pixels darker than this are never skin (default: 0.2)
    pub min_skin_brightness: f64,

    /// Pixels brighter than this are never skin (default: 1.0)
    pub max_skin_brightness: f64,

    // === Saturation Detection ===
    /// Minimum HSL saturation before a pixel counts (default: 0.4)
    pub saturation_threshold: f64,

    /// Pixels more saturated than this are ignored (default: 1.0)
    pub saturation_ceiling: f64,

    /// Darkest pixel considered for saturation (default: 0.05)
    pub min_saturation_brightness: f64,

    /// Brightest pixel considered for saturation (default: 0.9)
    pub max_saturation_brightness: f64,

    // === Search ===
    /// Larger side of the working image in pixels (default: 400)
    pub max_working_dimension: u32,

    /// Candidate offset step in working pixels (default: 8)
    pub candidate_step_size: u32,

    /// Scale decrement between candidate sizes (default: 0.1)
    pub candidate_scale_step: f64,

    /// Smallest candidate scale relative to the largest fitting crop (default: 0.9)
    pub min_candidate_scale: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Signal Weights
            edge_weight: 0.2,
            skin_weight: 1.8,
            saturation_weight: 0.3,

            // Composition
            outside_importance_weight: 0.5,
            rule_of_thirds_weight: 1.2,
            border_radius: 0.4,
            border_penalty: 20.0,

            // Edge Detection
            edge_radius: 1,

            // Skin Detection
            skin_color: [0.78, 0.57, 0.44],
            skin_threshold: 0.8,
            min_skin_brightness: 0.2,
            max_skin_brightness: 1.0,

            // Saturation Detection
            saturation_threshold: 0.4,
            saturation_ceiling: 1.0,
            min_saturation_brightness: 0.05,
            max_saturation_brightness: 0.9,

            // Search
            max_working_dimension: 400,
            candidate_step_size: 8,
            candidate_scale_step: 0.1,
            min_candidate_scale: 0.9,
        }
    }
}

impl Settings {
    /// Fast configuration for previews: smaller working image, coarser grid.
    pub fn fast() -> Self {
        Self {
            max_working_dimension: 256,
            candidate_step_size: 16,
            ..Default::default()
        }
    }

    /// Quality configuration: larger working image, denser search.
    pub fn quality() -> Self {
        Self {
            max_working_dimension: 640,
            candidate_step_size: 4,
            candidate_scale_step: 0.05,
            min_candidate_scale: 0.7,
            ..Default::default()
        }
    }

    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> CropResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check every option is usable.
    pub fn validate(&self) -> CropResult<()> {
        let weights = [
            ("edge_weight", self.edge_weight),
            ("skin_weight", self.skin_weight),
            ("saturation_weight", self.saturation_weight),
            ("outside_importance_weight", self.outside_importance_weight),
            ("rule_of_thirds_weight", self.rule_of_thirds_weight),
            ("border_penalty", self.border_penalty),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(CropError::invalid_settings(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        let unit_values = [
            ("border_radius", self.border_radius),
            ("skin_threshold", self.skin_threshold),
            ("saturation_threshold", self.saturation_threshold),
        ];
        for (name, value) in unit_values {
            if !(0.0..1.0).contains(&value) {
                return Err(CropError::invalid_settings(format!(
                    "{} must be in [0, 1), got {}",
                    name, value
                )));
            }
        }

        if self.skin_color.iter().any(|c| !c.is_finite()) {
            return Err(CropError::invalid_settings("skin_color must be finite"));
        }

        check_band(
            "skin brightness",
            self.min_skin_brightness,
            self.max_skin_brightness,
        )?;
        check_band(
            "saturation brightness",
            self.min_saturation_brightness,
            self.max_saturation_brightness,
        )?;
        check_band(
            "saturation",
            self.saturation_threshold,
            self.saturation_ceiling,
        )?;

        if self.edge_radius == 0 {
            return Err(CropError::invalid_settings("edge_radius must be at least 1"));
        }
        if self.max_working_dimension == 0 {
            return Err(CropError::invalid_settings(
                "max_working_dimension must be at least 1",
            ));
        }
        if self.candidate_step_size == 0 {
            return Err(CropError::invalid_settings(
                "candidate_step_size must be at least 1",
            ));
        }
        if !(self.candidate_scale_step > 0.0 && self.candidate_scale_step <= 1.0) {
            return Err(CropError::invalid_settings(format!(
                "candidate_scale_step must be in (0, 1], got {}",
                self.candidate_scale_step
            )));
        }
        if !(self.min_candidate_scale > 0.0 && self.min_candidate_scale <= 1.0) {
            return Err(CropError::invalid_settings(format!(
                "min_candidate_scale must be in (0, 1], got {}",
                self.min_candidate_scale
            )));
        }

        Ok(())
    }
}

fn check_band(name: &str, min: f64, max: f64) -> CropResult<()> {
    if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
        return Err(CropError::invalid_settings(format!(
            "{} band must satisfy 0 <= min <= max <= 1, got [{}, {}]",
            name, min, max
        )));
    }
    Ok(())
}
