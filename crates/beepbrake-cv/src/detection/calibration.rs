//! One-time scale calibration from the first accepted frame

use crate::error::GeometryError;
use beepbrake_core::{PointF, Size, SizeF};
use serde::Serialize;
use tracing::debug;

/// Scale bounds derived once per detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationState {
    pub template_size: Size,
    /// Frame size the calibration was locked to
    pub frame_size: Size,
    /// Largest template scale that still fits the frame
    pub scale_factor: f64,
    pub max_detect_size: SizeF,
    /// Frame center; not used by the current selection policy
    pub midpoint: PointF,
}

impl CalibrationState {
    pub fn compute(frame_size: Size, template_size: Size) -> Result<Self, GeometryError> {
        if !template_size.is_positive() {
            return Err(GeometryError::TemplateSize(template_size));
        }

        let frame_w = f64::from(frame_size.width);
        let frame_h = f64::from(frame_size.height);
        let w_factor = frame_w / f64::from(template_size.width);
        let h_factor = frame_h / f64::from(template_size.height);
        let factor = w_factor.min(h_factor);

        if !factor.is_finite() || factor <= 0.0 {
            return Err(GeometryError::ScaleFactor {
                frame: frame_size,
                template: template_size,
                factor,
            });
        }

        let max_detect_size = SizeF::new(
            f64::from(template_size.width) * factor,
            f64::from(template_size.height) * factor,
        );
        debug!(
            frame = %frame_size,
            scale_factor = factor,
            max_detect_size = %max_detect_size,
            "calibrated detection geometry"
        );

        Ok(Self {
            template_size,
            frame_size,
            scale_factor: factor,
            max_detect_size,
            midpoint: PointF::new(frame_w / 2.0, frame_h / 2.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_frame() -> Result<(), GeometryError> {
        let state = CalibrationState::compute(Size::new(640, 480), Size::new(20, 20))?;

        assert_eq!(state.scale_factor, 24.0);
        assert_eq!(state.max_detect_size, SizeF::new(480.0, 480.0));
        assert_eq!(state.midpoint, PointF::new(320.0, 240.0));
        Ok(())
    }

    #[test]
    fn test_non_square_template() -> Result<(), GeometryError> {
        let state = CalibrationState::compute(Size::new(300, 300), Size::new(40, 20))?;

        assert_eq!(state.scale_factor, 7.5);
        assert_eq!(state.max_detect_size, SizeF::new(300.0, 150.0));
        Ok(())
    }

    #[test]
    fn test_zero_template_dimension() {
        let err = CalibrationState::compute(Size::new(640, 480), Size::new(0, 20)).unwrap_err();
        assert_eq!(err, GeometryError::TemplateSize(Size::new(0, 20)));
    }

    #[test]
    fn test_negative_template_dimension() {
        let err = CalibrationState::compute(Size::new(640, 480), Size::new(20, -4)).unwrap_err();
        assert_eq!(err, GeometryError::TemplateSize(Size::new(20, -4)));
    }

    #[test]
    fn test_degenerate_frame() {
        let err = CalibrationState::compute(Size::new(0, 480), Size::new(20, 20)).unwrap_err();
        assert!(matches!(err, GeometryError::ScaleFactor { .. }));
    }
}
