use crate::error::{MeasureError, Result};
use crate::geometry::pixel_distance;
use crate::types::Point2D;

/// Pixels-per-meter conversion factor. Strictly positive and finite by
/// construction; absent from the session until the first successful
/// calibration, then overwritten (never merged) by later ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn pixels_per_meter(&self) -> f64 {
        self.0
    }

    /// Converts a pixel length to meters.
    pub fn to_meters(&self, pixels: f64) -> f64 {
        pixels / self.0
    }
}

/// Derives the scale factor from two clicked points on a reference object of
/// known length. Pure: publishing the result into session state is the
/// caller's job.
///
/// Assumes the reference object lies in the same focal plane as the objects
/// being measured; there is no perspective correction.
pub fn calibrate(reference_length_m: f64, points: &[Point2D]) -> Result<ScaleFactor> {
    if points.len() != 2 {
        return Err(MeasureError::InvalidCalibrationInput {
            reason: format!("expected 2 reference points, got {}", points.len()),
        });
    }
    if !reference_length_m.is_finite() || reference_length_m <= 0.0 {
        return Err(MeasureError::InvalidCalibrationInput {
            reason: format!(
                "reference length must be positive, got {}",
                reference_length_m
            ),
        });
    }
    let pixels = pixel_distance(points[0], points[1]);
    if pixels == 0.0 {
        return Err(MeasureError::InvalidCalibrationInput {
            reason: "reference points coincide".to_string(),
        });
    }
    Ok(ScaleFactor(pixels / reference_length_m))
}
