//! Named property zones (house, yard, garden...) measured from user-drawn
//! points, and property-wide summaries built from them.

use crate::calibration::{round_to, AreaUnits, DistanceUnits, ScaleFactor, UnitConverter};
use crate::error::MeasureError;
use crate::geometry::{cyclic_length, shoelace_area, Point, Polygon};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NOTE_ZONE_NO_SCALE: &str = "No scale provided. Measurements in pixels only.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneMeasurement {
    pub zone_type: String,
    pub area_sq_pixels: f64,
    pub perimeter_pixels: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixels_per_meter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<AreaUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perimeter: Option<DistanceUnits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Area and perimeter of one zone outline. Pixel values are rounded to two
/// decimals; real-world units are added when a scale is known.
pub fn measure_zone(zone_type: &str, points: &[Point], scale: Option<ScaleFactor>) -> Result<ZoneMeasurement> {
    if points.len() < 3 {
        return Err(MeasureError::InsufficientPoints {
            required: 3,
            actual: points.len(),
        });
    }

    let polygon = Polygon::new(points.to_vec());
    let area_px = shoelace_area(&polygon);
    let perimeter_px = cyclic_length(&polygon);

    let mut zone = ZoneMeasurement {
        zone_type: zone_type.to_string(),
        area_sq_pixels: round_to(area_px, 2),
        perimeter_pixels: round_to(perimeter_px, 2),
        pixels_per_meter: None,
        area: None,
        perimeter: None,
        note: None,
    };

    match scale {
        Some(scale) => {
            zone.pixels_per_meter = Some(scale.pixels_per_meter());
            zone.area = Some(UnitConverter::area_to_all_units(scale.to_square_meters(area_px)));
            zone.perimeter = Some(scale.distance_to_all_units(perimeter_px));
        }
        None => zone.note = Some(NOTE_ZONE_NO_SCALE.to_string()),
    }

    Ok(zone)
}

/// Pixel measurements of a zone as fed into a property summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneInput {
    pub area_pixels: f64,
    pub perimeter_pixels: Option<f64>,
}

impl From<&ZoneMeasurement> for ZoneInput {
    fn from(zone: &ZoneMeasurement) -> Self {
        Self {
            area_pixels: zone.area_sq_pixels,
            perimeter_pixels: Some(zone.perimeter_pixels),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub area: AreaUnits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perimeter: Option<DistanceUnits>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    pub property_total: AreaUnits,
    pub zones: BTreeMap<String, ZoneSummary>,
}

/// Convert every zone to real units and total the property area.
/// The total is summed before rounding.
pub fn summarize_zones(zones: &BTreeMap<String, ZoneInput>, scale: ScaleFactor) -> PropertySummary {
    let mut total_sq_m = 0.0;
    let mut summaries = BTreeMap::new();

    for (name, zone) in zones {
        let area_sq_m = scale.to_square_meters(zone.area_pixels);
        total_sq_m += area_sq_m;
        summaries.insert(
            name.clone(),
            ZoneSummary {
                area: UnitConverter::area_to_all_units(area_sq_m),
                perimeter: zone.perimeter_pixels.map(|px| scale.distance_to_all_units(px)),
            },
        );
    }

    PropertySummary {
        property_total: UnitConverter::area_to_all_units(total_sq_m),
        zones: summaries,
    }
}
