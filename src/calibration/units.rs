use crate::error::MeasureError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SQ_FEET_PER_SQ_METER: f64 = 10.764;
pub const ACRES_PER_SQ_METER: f64 = 0.000247105;
pub const FEET_PER_METER: f64 = 3.28084;
pub const YARDS_PER_METER: f64 = 1.09361;
pub const MILES_PER_METER: f64 = 0.000621371;

/// Units accepted for a real-world reference length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Meters,
    Feet,
    Yards,
    Inches,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "mm")]
    Millimeters,
}

impl LengthUnit {
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Feet => 0.3048,
            Self::Yards => 0.9144,
            Self::Inches => 0.0254,
            Self::Centimeters => 0.01,
            Self::Millimeters => 0.001,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meters => "meters",
            Self::Feet => "feet",
            Self::Yards => "yards",
            Self::Inches => "inches",
            Self::Centimeters => "cm",
            Self::Millimeters => "mm",
        }
    }

    /// Lenient parse for unit text printed next to a scale bar ("1 m", "50 ft").
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Some(Self::Meters),
            "ft" | "foot" | "feet" => Some(Self::Feet),
            "yd" | "yard" | "yards" => Some(Self::Yards),
            "in" | "inch" | "inches" => Some(Self::Inches),
            "cm" => Some(Self::Centimeters),
            "mm" => Some(Self::Millimeters),
            _ => None,
        }
    }
}

impl FromStr for LengthUnit {
    type Err = MeasureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "meters" => Ok(Self::Meters),
            "feet" => Ok(Self::Feet),
            "yards" => Ok(Self::Yards),
            "inches" => Ok(Self::Inches),
            "cm" => Ok(Self::Centimeters),
            "mm" => Ok(Self::Millimeters),
            _ => Err(MeasureError::UnknownUnit(s.to_string())),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area in every supported unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaUnits {
    pub sq_meters: f64,
    pub sq_feet: f64,
    pub acres: f64,
}

/// Distance in every supported unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DistanceUnits {
    pub meters: f64,
    pub feet: f64,
    pub yards: f64,
    pub miles: f64,
}

pub struct UnitConverter;

impl UnitConverter {
    /// Square meters and square feet to 2 decimals, acres to 4.
    pub fn area_to_all_units(area_sq_meters: f64) -> AreaUnits {
        AreaUnits {
            sq_meters: round_to(area_sq_meters, 2),
            sq_feet: round_to(area_sq_meters * SQ_FEET_PER_SQ_METER, 2),
            acres: round_to(area_sq_meters * ACRES_PER_SQ_METER, 4),
        }
    }

    /// Every distance unit to 2 decimals.
    pub fn distance_to_all_units(distance_meters: f64) -> DistanceUnits {
        DistanceUnits {
            meters: round_to(distance_meters, 2),
            feet: round_to(distance_meters * FEET_PER_METER, 2),
            yards: round_to(distance_meters * YARDS_PER_METER, 2),
            miles: round_to(distance_meters * MILES_PER_METER, 2),
        }
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parse_is_case_insensitive() {
        assert_eq!("FEET".parse::<LengthUnit>().unwrap(), LengthUnit::Feet);
        assert_eq!("Cm".parse::<LengthUnit>().unwrap(), LengthUnit::Centimeters);
        assert!(matches!(
            "parsecs".parse::<LengthUnit>(),
            Err(MeasureError::UnknownUnit(u)) if u == "parsecs"
        ));
    }

    #[test]
    fn test_label_aliases() {
        assert_eq!(LengthUnit::from_label(" ft "), Some(LengthUnit::Feet));
        assert_eq!(LengthUnit::from_label("m"), Some(LengthUnit::Meters));
        assert_eq!(LengthUnit::from_label("furlong"), None);
    }

    #[test]
    fn test_area_rounding_precision() {
        let units = UnitConverter::area_to_all_units(1.0);
        assert_eq!(units, AreaUnits { sq_meters: 1.0, sq_feet: 10.76, acres: 0.0002 });
    }

    #[test]
    fn test_distance_rounding_precision() {
        let units = UnitConverter::distance_to_all_units(1000.0);
        assert_eq!(units.meters, 1000.0);
        assert_eq!(units.feet, 3280.84);
        assert_eq!(units.yards, 1093.61);
        assert_eq!(units.miles, 0.62);
    }

    #[test]
    fn test_serde_unit_names() {
        let json = serde_json::to_string(&LengthUnit::Centimeters).unwrap();
        assert_eq!(json, "\"cm\"");
        let parsed: LengthUnit = serde_json::from_str("\"yards\"").unwrap();
        assert_eq!(parsed, LengthUnit::Yards);
    }
}
