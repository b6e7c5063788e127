//! Per-frame detection pipeline

pub mod calibration;
pub mod detector;
pub mod params;
pub mod selector;

pub use calibration::CalibrationState;
pub use detector::CarDetector;
pub use params::DetectionParams;
pub use selector::select_largest;
