//! Parameters handed to the multi-scale search

use super::calibration::CalibrationState;
use beepbrake_core::{DetectorConfig, Size};
use serde::Serialize;

/// Arguments of one multi-scale detection call
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionParams {
    /// Step between successive search scales
    pub scale_factor: f64,
    pub min_neighbors: i32,
    pub flags: i32,
    pub min_size: Size,
    pub max_size: Size,
}

impl DetectionParams {
    /// Combine the fixed configuration with the calibrated bounds
    pub fn new(config: &DetectorConfig, calibration: &CalibrationState) -> Self {
        Self {
            scale_factor: config.scale_factor,
            min_neighbors: config.min_neighbors,
            flags: config.flag,
            min_size: calibration.template_size,
            max_size: calibration.max_detect_size.to_size(),
        }
    }
}
