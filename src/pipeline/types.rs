use crate::calibration::{AreaUnits, DistanceUnits, ManualReference, ScaleFactor};
use crate::geometry::Polygon;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub const NOTE_AUTO_CLOSED: &str = "Boundary was open and was auto-closed.";
pub const NOTE_NO_SCALE: &str = "No reference scale detected. Measurements in pixels only.";
pub const NOTE_NO_BOUNDARY: &str = "No drawn lines detected.";
pub const NOTE_SUCCESS: &str = "Processing completed successfully.";

pub fn note_multiple_segments(count: usize) -> String {
    format!("Detected {count} separate line segments. Using the largest as main boundary.")
}

pub fn note_manual_scale(reference: &ManualReference) -> String {
    format!("Scale applied: {}", reference.describe())
}

pub fn note_auto_scale(scale: ScaleFactor) -> String {
    format!(
        "Scale detected automatically: {:.2} pixels per meter",
        scale.pixels_per_meter()
    )
}

/// Per-call measurement parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasureOptions {
    /// Known length used for calibration when no scale is found automatically.
    pub reference: Option<ManualReference>,
    /// Attach every area and length unit to a calibrated result.
    pub expand_units: bool,
    /// Promote per-stage diagnostics from debug to info.
    pub debug: bool,
}

impl MeasureOptions {
    pub fn with_reference(reference: ManualReference) -> Self {
        Self {
            reference: Some(reference),
            ..Self::default()
        }
    }
}

/// Unit of `length`; `area` is in the matching square unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementUnit {
    Pixels,
    Meters,
}

impl MeasurementUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementUnit::Pixels => "pixels",
            MeasurementUnit::Meters => "meters",
        }
    }
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the applied scale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleOrigin {
    Automatic,
    Manual,
}

/// Outcome of one measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementResult {
    pub measurement_id: Uuid,
    /// Perimeter in `unit`.
    pub length: f64,
    /// Enclosed area in square `unit`.
    pub area: f64,
    pub unit: MeasurementUnit,
    pub notes: Vec<String>,

    pub pixel_length: f64,
    pub pixel_area: f64,
    pub scale: Option<ScaleFactor>,
    pub scale_origin: Option<ScaleOrigin>,
    /// Number of candidate polygons the main boundary was chosen from.
    pub candidates: usize,
    pub auto_closed: bool,
    /// Main boundary after closure, in pixel coordinates.
    pub boundary: Option<Polygon>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_units: Option<AreaUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_units: Option<DistanceUnits>,
}

impl MeasurementResult {
    /// Zero measurement for an input with no boundary.
    pub fn empty(measurement_id: Uuid) -> Self {
        Self {
            measurement_id,
            length: 0.0,
            area: 0.0,
            unit: MeasurementUnit::Pixels,
            notes: vec![NOTE_NO_BOUNDARY.to_string()],
            pixel_length: 0.0,
            pixel_area: 0.0,
            scale: None,
            scale_origin: None,
            candidates: 0,
            auto_closed: false,
            boundary: None,
            area_units: None,
            length_units: None,
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.unit == MeasurementUnit::Meters
    }

    pub fn report(&self) -> MeasurementReport {
        MeasurementReport::from(self)
    }
}

/// Text record with two-decimal length and area and space-joined notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementReport {
    pub line_length: String,
    pub area: String,
    pub unit: String,
    pub notes: String,
}

impl From<&MeasurementResult> for MeasurementReport {
    fn from(result: &MeasurementResult) -> Self {
        let notes = if result.notes.is_empty() {
            NOTE_SUCCESS.to_string()
        } else {
            result.notes.join(" ")
        };
        Self {
            line_length: format!("{:.2}", result.length),
            area: format!("{:.2}", result.area),
            unit: result.unit.to_string(),
            notes,
        }
    }
}
