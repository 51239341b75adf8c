use super::{ClosurePolicy, Polygon};
use serde::{Deserialize, Serialize};

/// How the perimeter treats the segment from the last point back to the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerimeterPolicy {
    /// Always add the closing segment, whatever the polygon's closure state.
    #[default]
    AlwaysWrap,
    /// Add the closing segment only when the closure policy reports the
    /// polygon as closed; open polylines measure their drawn length.
    WrapIfClosed,
}

/// Perimeter and area of point polygons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryMeasurer {
    pub perimeter_policy: PerimeterPolicy,
    pub closure: ClosurePolicy,
}

impl GeometryMeasurer {
    pub fn new(perimeter_policy: PerimeterPolicy, closure: ClosurePolicy) -> Self {
        Self {
            perimeter_policy,
            closure,
        }
    }

    pub fn length(&self, polygon: &Polygon) -> f64 {
        match self.perimeter_policy {
            PerimeterPolicy::AlwaysWrap => cyclic_length(polygon),
            PerimeterPolicy::WrapIfClosed if self.closure.is_closed(polygon) => {
                cyclic_length(polygon)
            }
            PerimeterPolicy::WrapIfClosed => open_length(polygon),
        }
    }

    pub fn area(&self, polygon: &Polygon) -> f64 {
        shoelace_area(polygon)
    }
}

/// Sum of segment lengths including the closing segment. Zero below two points.
pub fn cyclic_length(polygon: &Polygon) -> f64 {
    let points = polygon.points();
    if points.len() < 2 {
        return 0.0;
    }
    let closing = points[points.len() - 1].distance_to(&points[0]);
    open_length(polygon) + closing
}

/// Sum of segment lengths along the drawn order only.
pub fn open_length(polygon: &Polygon) -> f64 {
    polygon
        .points()
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

/// Unsigned shoelace area over the cyclic point sequence. Zero below three points.
pub fn shoelace_area(polygon: &Polygon) -> f64 {
    let points = polygon.points();
    if points.len() < 3 {
        return 0.0;
    }
    // Each cross term fits in i64 but their sum over a polygon need not.
    let twice_signed: i128 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| i128::from(a.x) * i128::from(b.y) - i128::from(b.x) * i128::from(a.y))
        .sum();
    0.5 * (twice_signed as f64).abs()
}
