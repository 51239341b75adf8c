use boundary_measure::calibration::{NoAutoScale, ReferenceLineScaleSource, ScaleSourceChain};
use boundary_measure::*;

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

#[test]
fn test_manual_scale_in_meters() {
    let scale = manual_scale(100.0, 10.0, "meters").unwrap();
    assert_eq!(scale.pixels_per_meter(), 10.0);
}

#[test]
fn test_manual_scale_converts_units() {
    let feet = manual_scale(100.0, 10.0, "FEET").unwrap();
    assert!(
        approx(feet.pixels_per_meter(), 100.0 / 3.048, 1e-9),
        "got {}",
        feet.pixels_per_meter()
    );

    let cm = manual_scale(50.0, 25.0, "cm").unwrap();
    assert!(approx(cm.pixels_per_meter(), 200.0, 1e-9));

    let inches = manual_scale(254.0, 100.0, "Inches").unwrap();
    assert!(approx(inches.pixels_per_meter(), 100.0, 1e-9));
}

#[test]
fn test_manual_scale_rejects_bad_input() {
    assert!(matches!(
        manual_scale(100.0, 0.0, "meters"),
        Err(MeasureError::InvalidReference(_))
    ));
    assert!(matches!(
        manual_scale(0.0, 10.0, "meters"),
        Err(MeasureError::InvalidReference(_))
    ));
    assert!(matches!(
        manual_scale(100.0, -3.0, "yards"),
        Err(MeasureError::InvalidReference(_))
    ));
    assert!(matches!(
        manual_scale(100.0, f64::NAN, "meters"),
        Err(MeasureError::InvalidReference(_))
    ));
    assert!(matches!(
        manual_scale(100.0, 10.0, "parsecs"),
        Err(MeasureError::UnknownUnit(_))
    ));
}

#[test]
fn test_area_conversion_rounding() {
    let one = UnitConverter::area_to_all_units(1.0);
    assert_eq!(one, AreaUnits { sq_meters: 1.0, sq_feet: 10.76, acres: 0.0002 });

    let lot = UnitConverter::area_to_all_units(5_000.0);
    assert_eq!(lot.sq_feet, 53_820.0);
    assert_eq!(lot.acres, 1.2355);
}

#[test]
fn test_distance_conversion() {
    let km = UnitConverter::distance_to_all_units(1000.0);
    assert_eq!(km.meters, 1000.0);
    assert_eq!(km.feet, 3280.84);
    assert_eq!(km.yards, 1093.61);
    assert_eq!(km.miles, 0.62);
}

#[test]
fn test_pixel_distance_conversion() {
    let scale = ScaleFactor::new(60.0).unwrap();
    let units = scale.distance_to_all_units(2000.0);
    assert_eq!(units.meters, 33.33);
    assert_eq!(units.feet, 109.36);
}

#[test]
fn test_zoom_scale_estimate() {
    let equator = pixels_per_meter_from_zoom(0.0, 0).unwrap();
    assert!(approx(equator.pixels_per_meter(), 1.0 / 156_543.033_92, 1e-15));

    // Each zoom level doubles the resolution.
    let z18 = pixels_per_meter_from_zoom(0.0, 18).unwrap();
    let z19 = pixels_per_meter_from_zoom(0.0, 19).unwrap();
    assert!(approx(z19.pixels_per_meter(), 2.0 * z18.pixels_per_meter(), 1e-9));

    // Higher latitude means fewer meters per pixel.
    let north = pixels_per_meter_from_zoom(60.0, 18).unwrap();
    assert!(approx(north.pixels_per_meter(), 2.0 * z18.pixels_per_meter(), 1e-6));

    assert!(matches!(
        pixels_per_meter_from_zoom(90.0, 18),
        Err(MeasureError::InvalidReference(_))
    ));
}

#[test]
fn test_scale_factor_deserialization_is_validated() {
    let ok: ScaleFactor = serde_json::from_str("12.5").unwrap();
    assert_eq!(ok.pixels_per_meter(), 12.5);
    assert!(serde_json::from_str::<ScaleFactor>("-1.0").is_err());
    assert!(serde_json::from_str::<ScaleFactor>("0").is_err());
}

#[test]
fn test_shipped_scale_sources_find_nothing() {
    let raster = RasterImage::new(8, 8, Channels::Gray, vec![255; 64]).unwrap();
    let line: Polygon = vec![Point::new(0, 0), Point::new(100, 0), Point::new(100, 3), Point::new(0, 3)]
        .into_iter()
        .collect();
    let polygons = vec![line];

    assert_eq!(ReferenceLineScaleSource::default().candidates(&polygons), vec![0]);

    let chain = ScaleSourceChain::standard();
    assert_eq!(chain.len(), 2);
    assert!(chain.detect(&raster, &polygons).unwrap().is_none());
    assert!(NoAutoScale.detect(&raster, &polygons).unwrap().is_none());
}
