pub mod calibration;
pub mod config;
pub mod data;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod pipeline;
pub mod utils;
pub mod visualization;

pub use calibration::{
    manual_scale, pixels_per_meter_from_zoom, AreaUnits, DistanceUnits, LengthUnit, ManualReference,
    ScaleFactor, ScaleSource, UnitConverter,
};
pub use config::MeasureConfig;
pub use data::{load_raster, Channels, RasterImage};
pub use detection::BoundaryDetector;
pub use error::MeasureError;
pub use geometry::{ClosurePolicy, GeometryMeasurer, PerimeterPolicy, Point, Polygon};
pub use pipeline::{
    MeasureOptions, MeasurementPipeline, MeasurementReport, MeasurementResult, MeasurementUnit,
};

pub type Result<T> = std::result::Result<T, MeasureError>;
