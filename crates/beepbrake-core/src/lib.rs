//! Shared types for the beepbrake detection stage

pub mod config;
pub mod geometry;

pub use config::{ConfigError, DetectorConfig};
pub use geometry::{Candidate, PointF, Size, SizeF};
