//! Typed pipeline errors
//!
//! These travel inside `anyhow::Error` and can be recovered with
//! `downcast_ref::<GeometryError>()`.

use beepbrake_core::Size;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("misconfigured geometry: template size {0} must be positive in both dimensions")]
    TemplateSize(Size),
    #[error(
        "misconfigured geometry: frame {frame} against template {template} \
         gives scale factor {factor}"
    )]
    ScaleFactor {
        frame: Size,
        template: Size,
        factor: f64,
    },
}
