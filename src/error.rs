use thiserror::Error;

/// Errors surfaced by the measurement core.
///
/// A missing boundary is not an error: the pipeline reports it as an empty
/// measurement. Degenerate polygons likewise measure as zero.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// The pixel matrix could not be produced or does not describe an image.
    #[error("input image unavailable: {0}")]
    InputUnavailable(String),

    /// Manual scale inputs are non-positive or not finite.
    #[error("invalid scale reference: {0}")]
    InvalidReference(String),

    /// Unit name outside the supported set.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// An area needs at least three vertices.
    #[error("at least {required} points required, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },

    /// Configuration failed validation.
    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    /// Encoding or writing a rendered image failed.
    #[error("image output failed: {0}")]
    ImageOutput(#[from] image::ImageError),

    /// Failure inside the OpenCV backend.
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}
