use super::units::{DistanceUnits, LengthUnit, UnitConverter};
use crate::error::MeasureError;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Web-Mercator ground resolution at the equator for zoom 0, in meters per pixel.
const EQUATOR_METERS_PER_PIXEL_Z0: f64 = 156543.03392;

/// Pixels per real-world meter. Always strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn new(pixels_per_meter: f64) -> Result<Self> {
        if pixels_per_meter.is_finite() && pixels_per_meter > 0.0 {
            Ok(Self(pixels_per_meter))
        } else {
            Err(MeasureError::InvalidReference(format!(
                "scale factor must be positive and finite, got {pixels_per_meter}"
            )))
        }
    }

    pub fn pixels_per_meter(self) -> f64 {
        self.0
    }

    pub fn to_meters(self, pixels: f64) -> f64 {
        pixels / self.0
    }

    pub fn to_square_meters(self, square_pixels: f64) -> f64 {
        square_pixels / (self.0 * self.0)
    }

    pub fn distance_to_all_units(self, pixels: f64) -> DistanceUnits {
        UnitConverter::distance_to_all_units(self.to_meters(pixels))
    }
}

impl TryFrom<f64> for ScaleFactor {
    type Error = MeasureError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ScaleFactor> for f64 {
    fn from(scale: ScaleFactor) -> Self {
        scale.0
    }
}

/// A known real-world length spanning a measured number of pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualReference {
    pub pixel_length: f64,
    pub real_length: f64,
    pub unit: String,
}

impl ManualReference {
    pub fn new(pixel_length: f64, real_length: f64, unit: impl Into<String>) -> Self {
        Self {
            pixel_length,
            real_length,
            unit: unit.into(),
        }
    }

    pub fn scale(&self) -> Result<ScaleFactor> {
        manual_scale(self.pixel_length, self.real_length, &self.unit)
    }

    /// Human-readable form used in measurement notes.
    pub fn describe(&self) -> String {
        format!(
            "{} {} = {} pixels",
            self.real_length, self.unit, self.pixel_length
        )
    }
}

/// Pixels per meter from a reference of `real_length` `unit`s spanning
/// `pixel_length` pixels.
pub fn manual_scale(pixel_length: f64, real_length: f64, unit: &str) -> Result<ScaleFactor> {
    let unit: LengthUnit = unit.parse()?;
    let real_length_m = real_length * unit.meters_per_unit();

    if !(real_length_m > 0.0) {
        return Err(MeasureError::InvalidReference(format!(
            "reference length must be positive, got {real_length} {unit}"
        )));
    }
    if !(pixel_length > 0.0) {
        return Err(MeasureError::InvalidReference(format!(
            "reference pixel length must be positive, got {pixel_length}"
        )));
    }

    ScaleFactor::new(pixel_length / real_length_m)
}

/// Pixels per meter of a Web-Mercator map tile at `latitude` degrees and `zoom`.
pub fn pixels_per_meter_from_zoom(latitude: f64, zoom: u8) -> Result<ScaleFactor> {
    if !(latitude.abs() < 90.0) {
        return Err(MeasureError::InvalidReference(format!(
            "no ground resolution at latitude {latitude}"
        )));
    }
    let meters_per_pixel = EQUATOR_METERS_PER_PIXEL_Z0 / 2f64.powi(i32::from(zoom))
        * latitude.to_radians().cos();
    ScaleFactor::new(1.0 / meters_per_pixel)
}
