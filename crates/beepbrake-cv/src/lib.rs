//! Beepbrake Computer Vision Library
//!
//! Single-object car detection stage: one-time calibration, smoothing,
//! multi-scale cascade search and largest-candidate selection per frame.

pub mod detection;
pub mod error;
pub mod metrics;
pub mod sink;
pub mod utils;

#[cfg(feature = "opencv")]
pub mod cascade;

// Re-export commonly used types
pub use beepbrake_core::{Candidate, DetectorConfig, PointF, Size, SizeF};
pub use detection::{CalibrationState, CarDetector, DetectionParams};
pub use error::GeometryError;
pub use metrics::{FrameMetrics, MetricsSummary};
pub use sink::{ChannelSink, DetectionEvent, RecordingSink};
pub use traits::FnSink;

#[cfg(feature = "opencv")]
pub use cascade::HaarCascade;

// Error handling
pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Latency timer bracketing every accepted `detect` call
pub const HAAR_TIME: &str = "haar_time";
/// Counter of frames that went through the whole pipeline
pub const ANALYZED_FRAMES: &str = "analyzed_frames";

/// Seams between the pipeline and its collaborators
pub mod traits {
    use super::*;
    use image::GrayImage;
    use std::sync::Arc;

    /// Multi-scale object search over a grayscale image
    ///
    /// Implementations own the detection math; the pipeline only decides the
    /// parameters. Errors are handed back to the caller of `detect` untouched.
    pub trait MultiScaleDetector {
        fn detect_multi_scale(
            &mut self,
            image: &GrayImage,
            params: &DetectionParams,
        ) -> Result<Vec<Candidate>>;
    }

    /// Receives the outcome of each completed `detect` call
    pub trait ResultSink {
        fn set_current_found_rect(&mut self, frame: &GrayImage, found: Option<Candidate>);
    }

    /// Pass-through timing and counting hooks
    pub trait Instrumentation {
        fn start_timer(&self, id: &'static str);
        fn stop_timer(&self, id: &'static str);
        fn increment_count(&self, id: &'static str);
    }

    impl<T: MultiScaleDetector + ?Sized> MultiScaleDetector for &mut T {
        fn detect_multi_scale(
            &mut self,
            image: &GrayImage,
            params: &DetectionParams,
        ) -> Result<Vec<Candidate>> {
            (**self).detect_multi_scale(image, params)
        }
    }

    impl<T: MultiScaleDetector + ?Sized> MultiScaleDetector for Box<T> {
        fn detect_multi_scale(
            &mut self,
            image: &GrayImage,
            params: &DetectionParams,
        ) -> Result<Vec<Candidate>> {
            (**self).detect_multi_scale(image, params)
        }
    }

    impl<S: ResultSink + ?Sized> ResultSink for &mut S {
        fn set_current_found_rect(&mut self, frame: &GrayImage, found: Option<Candidate>) {
            (**self).set_current_found_rect(frame, found)
        }
    }

    impl<S: ResultSink + ?Sized> ResultSink for Box<S> {
        fn set_current_found_rect(&mut self, frame: &GrayImage, found: Option<Candidate>) {
            (**self).set_current_found_rect(frame, found)
        }
    }

    /// Turns a closure into a result sink
    #[derive(Debug, Clone, Copy)]
    pub struct FnSink<F>(pub F);

    impl<F> ResultSink for FnSink<F>
    where
        F: FnMut(&GrayImage, Option<Candidate>),
    {
        fn set_current_found_rect(&mut self, frame: &GrayImage, found: Option<Candidate>) {
            (self.0)(frame, found)
        }
    }

    impl<T: Instrumentation + ?Sized> Instrumentation for &T {
        fn start_timer(&self, id: &'static str) {
            (**self).start_timer(id)
        }

        fn stop_timer(&self, id: &'static str) {
            (**self).stop_timer(id)
        }

        fn increment_count(&self, id: &'static str) {
            (**self).increment_count(id)
        }
    }

    impl<T: Instrumentation + ?Sized> Instrumentation for Arc<T> {
        fn start_timer(&self, id: &'static str) {
            (**self).start_timer(id)
        }

        fn stop_timer(&self, id: &'static str) {
            (**self).stop_timer(id)
        }

        fn increment_count(&self, id: &'static str) {
            (**self).increment_count(id)
        }
    }

    /// Instrumentation that records nothing
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NoInstrumentation;

    impl Instrumentation for NoInstrumentation {
        fn start_timer(&self, _id: &'static str) {}
        fn stop_timer(&self, _id: &'static str) {}
        fn increment_count(&self, _id: &'static str) {}
    }
}
