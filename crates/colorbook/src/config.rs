use serde::{Deserialize, Serialize};

use crate::VectorizeError;

/// Parameters of a conversion. Partial JSON fills the rest with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizeConfig {
    /// Stroke width of the centerline layer, in user units.
    pub stroke_width: f32,
    /// Radius of the elliptical closing element; 0 skips closing.
    pub close_radius: usize,
    /// Components with at least this many pixels become solids.
    pub min_solid_area: usize,
    /// Emit the white `paintable` rectangle under everything else.
    pub background_plate: bool,
}

impl Default for VectorizeConfig {
    fn default() -> Self {
        Self {
            stroke_width: cb_svg::DEFAULT_STROKE_WIDTH,
            close_radius: 1,
            min_solid_area: cb_label::DEFAULT_MIN_SOLID_AREA,
            background_plate: true,
        }
    }
}

impl VectorizeConfig {
    pub fn validate(&self) -> Result<(), VectorizeError> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(VectorizeError::InvalidConfig(format!(
                "stroke_width must be a positive finite number, got {}",
                self.stroke_width
            )));
        }
        if self.min_solid_area == 0 {
            return Err(VectorizeError::InvalidConfig(
                "min_solid_area must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
