//! OpenCV Haar cascade backend

use crate::Result;
use crate::detection::DetectionParams;
use crate::traits::MultiScaleDetector;
use anyhow::{Context, bail};
use beepbrake_core::{Candidate, Size};
use image::GrayImage;
use opencv::{
    boxed_ref::BoxedRef,
    core::{self, Mat, Rect, Vector},
    objdetect::CascadeClassifier,
    prelude::*,
};
use std::path::Path;
use tracing::info;

/// Viola-Jones cascade loaded from an OpenCV XML model
pub struct HaarCascade {
    classifier: CascadeClassifier,
    found: Vector<Rect>,
}

impl HaarCascade {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path
            .to_str()
            .with_context(|| format!("Cascade path is not valid UTF-8: {:?}", path))?;

        let classifier = CascadeClassifier::new(path_str)
            .with_context(|| format!("Failed to load cascade: {:?}", path))?;
        if classifier.empty()? {
            bail!("Cascade file holds no classifier: {:?}", path);
        }

        info!(path = %path.display(), "loaded haar cascade");
        Ok(Self {
            classifier,
            found: Vector::new(),
        })
    }

    /// Window size the loaded cascade was trained on
    pub fn original_window_size(&self) -> Result<Size> {
        let size = self.classifier.get_original_window_size()?;
        Ok(Size::new(size.width, size.height))
    }
}

/// View the grayscale buffer as a single-channel Mat without copying
fn gray_to_mat(image: &GrayImage) -> Result<BoxedRef<'_, Mat>> {
    let (width, height) = image.dimensions();
    let pixels = image.as_raw().as_slice();
    Mat::new_rows_cols_with_data(height as i32, width as i32, pixels)
        .context("Failed to wrap frame as OpenCV Mat")
}

impl MultiScaleDetector for HaarCascade {
    fn detect_multi_scale(
        &mut self,
        image: &GrayImage,
        params: &DetectionParams,
    ) -> Result<Vec<Candidate>> {
        let mat = gray_to_mat(image)?;

        self.found.clear();
        self.classifier
            .detect_multi_scale(
                &mat,
                &mut self.found,
                params.scale_factor,
                params.min_neighbors,
                params.flags,
                core::Size::new(params.min_size.width, params.min_size.height),
                core::Size::new(params.max_size.width, params.max_size.height),
            )?;

        Ok(self
            .found
            .iter()
            .map(|rect| Candidate::new(rect.x, rect.y, rect.width, rect.height))
            .collect())
    }
}
