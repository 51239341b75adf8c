use boundary_measure::geometry::{cyclic_length, open_length, shoelace_area};
use boundary_measure::*;

fn polygon(coords: &[(i32, i32)]) -> Polygon {
    coords.iter().copied().map(Point::from).collect()
}

#[test]
fn test_square_area_and_perimeter() {
    let measurer = GeometryMeasurer::default();
    for side in [1, 7, 250] {
        let square = polygon(&[(0, 0), (side, 0), (side, side), (0, side)]);
        let s = f64::from(side);
        assert_eq!(measurer.area(&square), s * s, "area of square with side {side}");
        assert!(
            (measurer.length(&square) - 4.0 * s).abs() < 1e-9,
            "perimeter of square with side {side}"
        );
    }
}

#[test]
fn test_area_is_orientation_independent() {
    let shape = polygon(&[(3, 4), (40, 9), (35, 60), (12, 41), (0, 22)]);
    assert_eq!(shoelace_area(&shape), shoelace_area(&shape.reversed()));
    assert!(shoelace_area(&shape) > 0.0);
}

#[test]
fn test_degenerate_polygons_measure_zero() {
    let measurer = GeometryMeasurer::default();
    let empty = Polygon::default();
    let single = polygon(&[(5, 5)]);
    let pair = polygon(&[(0, 0), (3, 4)]);

    assert_eq!(measurer.length(&empty), 0.0);
    assert_eq!(measurer.length(&single), 0.0);
    assert_eq!(measurer.area(&pair), 0.0);
    // Two points wrap back along the same segment.
    assert_eq!(measurer.length(&pair), 10.0);
}

#[test]
fn test_auto_close_matches_wrapped_perimeter() {
    let closure = ClosurePolicy::default();
    let open = polygon(&[(0, 0), (30, 0), (30, 20), (0, 20), (0, 10)]);
    assert!(!closure.is_closed(&open));

    let wrapped = cyclic_length(&open);
    let closed_once = closure.auto_close(open.clone());
    let closed_twice = closure.auto_close(closed_once.clone());

    assert!(closure.is_closed(&closed_once));
    assert!((open_length(&closed_once) - wrapped).abs() < 1e-9);
    assert!((cyclic_length(&closed_once) - wrapped).abs() < 1e-9);
    assert!((cyclic_length(&closed_twice) - wrapped).abs() < 1e-9);
    assert_eq!(shoelace_area(&closed_twice), shoelace_area(&open));
}

#[test]
fn test_closure_threshold_is_strict() {
    let closure = ClosurePolicy::new(5.0);
    let gap_of_five = polygon(&[(0, 0), (20, 0), (20, 20), (0, 5)]);
    let gap_of_four = polygon(&[(0, 0), (20, 0), (20, 20), (0, 4)]);
    assert!(!closure.is_closed(&gap_of_five));
    assert!(closure.is_closed(&gap_of_four));
}

#[test]
fn test_perimeter_policies_differ_on_open_shapes() {
    let u_shape = polygon(&[(0, 0), (0, 10), (10, 10), (10, 0)]);
    let always = GeometryMeasurer::new(PerimeterPolicy::AlwaysWrap, ClosurePolicy::default());
    let if_closed = GeometryMeasurer::new(PerimeterPolicy::WrapIfClosed, ClosurePolicy::default());

    assert!((always.length(&u_shape) - 40.0).abs() < 1e-9);
    assert!((if_closed.length(&u_shape) - 30.0).abs() < 1e-9);
    assert_eq!(always.area(&u_shape), if_closed.area(&u_shape));
}
