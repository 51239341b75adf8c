use boundary_measure::config::DetectionConfig;
use boundary_measure::detection::{AdaptiveThresholdMask, ColorMask, EdgeMask, MaskStrategy};
use boundary_measure::geometry::shoelace_area;
use boundary_measure::*;
use image::{GrayImage, Luma, Rgb, RgbImage};

fn largest_area(polygons: &[Polygon]) -> f64 {
    polygons.iter().map(shoelace_area).fold(0.0, f64::max)
}

fn rectangle_outline(width: u32, height: u32, ink: Rgb<u8>) -> RgbImage {
    // 600x400 rectangle at (100, 100), 5 px stroke
    RgbImage::from_fn(width, height, |x, y| {
        let inside_outer = (100..=700).contains(&x) && (100..=500).contains(&y);
        let inside_inner = (105..=695).contains(&x) && (105..=495).contains(&y);
        if inside_outer && !inside_inner {
            ink
        } else {
            Rgb([255, 255, 255])
        }
    })
}

#[test]
fn test_uniform_image_has_no_boundaries() {
    let detector = BoundaryDetector::default();
    for shade in [255u8, 200, 120] {
        let raster = RasterImage::from_rgb(RgbImage::from_pixel(96, 64, Rgb([shade, shade, shade]))).unwrap();
        let detection = detector.detect_with_diagnostics(&raster).unwrap();
        assert!(detection.polygons.is_empty(), "shade {shade} produced boundaries");
        assert_eq!(detection.fused_pixels, 0, "shade {shade}");
    }
}

#[test]
fn test_blue_rectangle_area() {
    let raster = RasterImage::from_rgb(rectangle_outline(800, 600, Rgb([0, 0, 255]))).unwrap();
    let polygons = BoundaryDetector::default().detect(&raster).unwrap();

    assert!(!polygons.is_empty());
    let area = largest_area(&polygons);
    assert!(area > 230_000.0 && area < 270_000.0, "largest area {area}");
}

#[test]
fn test_gray_drawing_uses_edge_and_threshold_masks() {
    let rgb = rectangle_outline(800, 600, Rgb([20, 20, 20]));
    let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| Luma([rgb.get_pixel(x, y)[0]]));
    let raster = RasterImage::from_gray(gray).unwrap();

    let detection = BoundaryDetector::default().detect_with_diagnostics(&raster).unwrap();
    let color_stats = detection.masks.iter().find(|m| m.strategy == "color").unwrap();
    assert_eq!(color_stats.foreground_pixels, None);

    let area = largest_area(&detection.polygons);
    assert!(area > 230_000.0 && area < 270_000.0, "largest area {area}");
}

#[test]
fn test_color_mask_alone_finds_red_ink() {
    let raster = RasterImage::from_rgb(rectangle_outline(800, 600, Rgb([220, 10, 10]))).unwrap();
    let config = DetectionConfig::default();
    let strategies: Vec<Box<dyn MaskStrategy>> =
        vec![Box::new(ColorMask::new(config.color_ranges.clone()))];
    let detector = BoundaryDetector::with_strategies(config.clone(), strategies);

    let detection = detector.detect_with_diagnostics(&raster).unwrap();
    assert!(detection.masks[0].foreground_pixels.unwrap_or(0) > 9_000);
    assert_eq!(detection.polygons.len(), 1);
    let area = largest_area(&detection.polygons);
    assert!(area > 230_000.0 && area < 270_000.0, "largest area {area}");
}

#[test]
fn test_min_area_filter_drops_small_marks() {
    let mut img = rectangle_outline(800, 600, Rgb([0, 0, 255]));
    for y in 20..24 {
        for x in 20..24 {
            img.put_pixel(x, y, Rgb([0, 0, 0]));
        }
    }
    let raster = RasterImage::from_rgb(img).unwrap();

    let config = DetectionConfig {
        min_contour_area: 1_000.0,
        ..DetectionConfig::default()
    };
    let polygons = BoundaryDetector::new(config).detect(&raster).unwrap();
    assert_eq!(polygons.len(), 1);
}

#[test]
fn test_detection_is_deterministic() {
    let raster = RasterImage::from_rgb(rectangle_outline(800, 600, Rgb([0, 128, 0]))).unwrap();
    let detector = BoundaryDetector::default();
    let first = detector.detect(&raster).unwrap();
    let second = detector.detect(&raster).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_strategy_names() {
    let strategies: Vec<Box<dyn MaskStrategy>> = vec![
        Box::new(EdgeMask { low: 50.0, high: 150.0, aperture: 3 }),
        Box::new(AdaptiveThresholdMask { block_size: 11, c: 2.0 }),
    ];
    let detector = BoundaryDetector::with_strategies(DetectionConfig::default(), strategies);
    assert_eq!(detector.strategy_names(), vec!["edge", "adaptive_threshold"]);
}
