//! Boundary detection from raster images.
//!
//! Each [`MaskStrategy`] turns a [`PreparedFrame`] into a binary mask; the
//! [`BoundaryDetector`] fuses them and traces outer contours.

pub mod detector;
pub mod masks;
pub mod preprocess;

pub use detector::{BoundaryDetector, Detection, MaskStats};
pub use masks::{default_strategies, AdaptiveThresholdMask, ColorMask, EdgeMask, MaskStrategy};
pub use preprocess::{prepare_frame, PreparedFrame};
