//! Single-object car detector

use super::calibration::CalibrationState;
use super::params::DetectionParams;
use super::selector::select_largest;
use crate::error::GeometryError;
use crate::traits::{Instrumentation, MultiScaleDetector, NoInstrumentation, ResultSink};
use crate::utils::{WorkingBuffer, frame_size};
use crate::{ANALYZED_FRAMES, HAAR_TIME, Result};
use beepbrake_core::DetectorConfig;
use image::GrayImage;
use tracing::{info, trace};

/// Runs the cascade on each incoming frame and reports the largest hit
///
/// Geometry is locked to the first accepted frame. Later frames with other
/// dimensions are still searched, but with the bounds of the first one.
/// `detect` needs `&mut self`; share a detector across threads only behind
/// a lock.
pub struct CarDetector<C, S, I = NoInstrumentation> {
    cascade: C,
    config: DetectorConfig,
    sink: S,
    instrumentation: I,
    calibration: Option<CalibrationState>,
    working: WorkingBuffer,
}

impl<C, S> CarDetector<C, S>
where
    C: MultiScaleDetector,
    S: ResultSink,
{
    /// Create a detector without instrumentation
    pub fn new(cascade: C, config: DetectorConfig, sink: S) -> Self {
        Self::with_instrumentation(cascade, config, sink, NoInstrumentation)
    }
}

impl<C, S, I> CarDetector<C, S, I>
where
    C: MultiScaleDetector,
    S: ResultSink,
    I: Instrumentation,
{
    pub fn with_instrumentation(
        cascade: C,
        config: DetectorConfig,
        sink: S,
        instrumentation: I,
    ) -> Self {
        Self {
            cascade,
            config,
            sink,
            instrumentation,
            calibration: None,
            working: WorkingBuffer::new(),
        }
    }

    /// Detect the most relevant car in `frame` and report it to the sink
    ///
    /// Missing or empty frames are ignored. Any other call either delivers
    /// exactly one result to the sink or returns an error without
    /// delivering anything.
    pub fn detect<'f>(&mut self, frame: impl Into<Option<&'f GrayImage>>) -> Result<()> {
        let Some(frame) = frame.into() else {
            trace!("no frame, skipping");
            return Ok(());
        };
        if frame.width() == 0 || frame.height() == 0 {
            trace!("empty frame, skipping");
            return Ok(());
        }

        self.instrumentation.start_timer(HAAR_TIME);
        let outcome = self.haar(frame);
        self.instrumentation.stop_timer(HAAR_TIME);
        outcome?;

        self.instrumentation.increment_count(ANALYZED_FRAMES);
        Ok(())
    }

    fn haar(&mut self, frame: &GrayImage) -> Result<()> {
        let calibration = self.calibrate(frame)?;
        let params = DetectionParams::new(&self.config, &calibration);

        let analyze = self.working.prepare(frame);
        let found = self.cascade.detect_multi_scale(analyze, &params)?;

        let selected = select_largest(&found);
        self.sink.set_current_found_rect(frame, selected);
        Ok(())
    }

    fn calibrate(&mut self, frame: &GrayImage) -> Result<CalibrationState, GeometryError> {
        if let Some(calibration) = self.calibration {
            return Ok(calibration);
        }

        let calibration = CalibrationState::compute(frame_size(frame), self.config.template_size)?;
        info!(
            frame = %calibration.frame_size,
            max_detect_size = %calibration.max_detect_size,
            "detector calibrated"
        );
        self.calibration = Some(calibration);
        Ok(calibration)
    }

    /// Geometry derived from the first accepted frame, if any
    pub fn calibration(&self) -> Option<&CalibrationState> {
        self.calibration.as_ref()
    }

    /// Smoothed copy of the most recently accepted frame
    pub fn working_buffer(&self) -> Option<&GrayImage> {
        self.working.image()
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn instrumentation(&self) -> &I {
        &self.instrumentation
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
