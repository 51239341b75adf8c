use super::Polygon;
use serde::{Deserialize, Serialize};

/// Default first-to-last distance under which a boundary counts as closed.
pub const DEFAULT_CLOSURE_THRESHOLD_PX: f64 = 5.0;

/// Decides whether a boundary is closed and closes it when it is not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosurePolicy {
    pub threshold_px: f64,
}

impl Default for ClosurePolicy {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_CLOSURE_THRESHOLD_PX,
        }
    }
}

impl ClosurePolicy {
    pub fn new(threshold_px: f64) -> Self {
        Self { threshold_px }
    }

    /// True when the polygon has at least three points and its endpoints lie
    /// strictly closer than the threshold.
    pub fn is_closed(&self, polygon: &Polygon) -> bool {
        if polygon.len() < 3 {
            return false;
        }
        match (polygon.first(), polygon.last()) {
            (Some(first), Some(last)) => first.distance_to(last) < self.threshold_px,
            _ => false,
        }
    }

    /// Appends a copy of the first point.
    pub fn auto_close(&self, polygon: Polygon) -> Polygon {
        let Some(&first) = polygon.first() else {
            return polygon;
        };
        let mut points = polygon.into_points();
        points.push(first);
        Polygon::new(points)
    }
}
