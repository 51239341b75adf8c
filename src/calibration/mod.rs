//! Pixel-to-world calibration: manual references, automatic scale hooks and
//! unit conversion.

pub mod auto;
pub mod scale;
pub mod units;

pub use auto::*;
pub use scale::*;
pub use units::*;
