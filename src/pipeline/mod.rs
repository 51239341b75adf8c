//! Measurement orchestration: detection, closure, geometry and calibration
//! combined into one result per call.

pub mod measurement;
pub mod types;
pub mod zones;

pub use measurement::*;
pub use types::*;
pub use zones::*;
