//! Feed still images through one detector, in order

use anyhow::{Context, Result};
use beepbrake_cv::CarDetector;
use beepbrake_cv::traits::{Instrumentation, MultiScaleDetector, ResultSink};
use image::GrayImage;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Load an image file as an 8-bit grayscale frame
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
    let image = image::open(&path)
        .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?;
    Ok(image.to_luma8())
}

/// Run every frame through `detector`
///
/// Unreadable files are handed over as missing frames, which the detector
/// skips. Detection errors stop the run.
pub fn run_frames<C, S, I>(detector: &mut CarDetector<C, S, I>, frames: &[PathBuf]) -> Result<()>
where
    C: MultiScaleDetector,
    S: ResultSink,
    I: Instrumentation,
{
    for path in frames {
        let frame = match load_frame(path) {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable frame");
                None
            }
        };

        detector
            .detect(frame.as_ref())
            .with_context(|| format!("Detection failed on {:?}", path))?;
    }

    Ok(())
}
