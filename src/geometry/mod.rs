//! Point and polygon primitives plus the closure and measurement rules
//! applied to detected boundaries.

pub mod closure;
pub mod measure;

pub use closure::*;
pub use measure::*;

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        dx.hypot(dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounds of a point set, sized inclusively like a pixel box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i64,
    pub height: i64,
}

impl BoundingBox {
    /// Long side over short side, with the short side clamped to one pixel.
    pub fn aspect_ratio(&self) -> f64 {
        let long = self.width.max(self.height) as f64;
        let short = self.width.min(self.height).max(1) as f64;
        long / short
    }
}

/// Ordered boundary points. May be open or closed; closing is the job of
/// [`ClosurePolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.points.last()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn reversed(&self) -> Self {
        Self {
            points: self.points.iter().rev().copied().collect(),
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(BoundingBox {
            x: min_x,
            y: min_y,
            width: i64::from(max_x) - i64::from(min_x) + 1,
            height: i64::from(max_y) - i64::from(min_y) + 1,
        })
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point> for Polygon {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_is_inclusive() {
        let poly: Polygon = [(2, 3), (10, 3), (10, 5)].into_iter().map(Point::from).collect();
        let bbox = poly.bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox { x: 2, y: 3, width: 9, height: 3 });
        assert!((bbox.aspect_ratio() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box_spans_full_coordinate_range() {
        let poly: Polygon = [(i32::MIN, 0), (i32::MAX, 1)].into_iter().map(Point::from).collect();
        let bbox = poly.bounding_box().unwrap();
        assert_eq!(bbox.width, 1i64 << 32);
        assert_eq!(bbox.height, 2);
    }

    #[test]
    fn test_empty_polygon_has_no_bounds() {
        assert!(Polygon::default().bounding_box().is_none());
    }

    #[test]
    fn test_polygon_serializes_as_point_list() {
        let poly = Polygon::new(vec![Point::new(1, 2), Point::new(3, 4)]);
        let json = serde_json::to_string(&poly).unwrap();
        assert_eq!(json, r#"[{"x":1,"y":2},{"x":3,"y":4}]"#);
    }
}
