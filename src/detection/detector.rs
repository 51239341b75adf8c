use super::masks::{default_strategies, MaskStrategy};
use super::preprocess::{prepare_frame, PreparedFrame};
use crate::config::DetectionConfig;
use crate::data::RasterImage;
use crate::geometry::{shoelace_area, Polygon};
use crate::utils::polygon_from_cv;
use crate::Result;
use opencv::core::{self, Mat, Point as CvPoint, Size, Vector};
use opencv::imgproc;
use opencv::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

/// Foreground pixel count contributed by one mask strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStats {
    pub strategy: String,
    /// `None` when the strategy did not apply to this input.
    pub foreground_pixels: Option<i32>,
}

/// Detected polygons plus what each stage produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub polygons: Vec<Polygon>,
    pub masks: Vec<MaskStats>,
    pub fused_pixels: i32,
    pub closed_pixels: i32,
    pub raw_contours: usize,
    pub processing_time_ms: f32,
}

/// Finds hand-drawn boundaries in a raster by fusing several binary masks,
/// bridging small gaps morphologically and tracing outer contours.
pub struct BoundaryDetector {
    config: DetectionConfig,
    strategies: Vec<Box<dyn MaskStrategy>>,
}

impl BoundaryDetector {
    pub fn new(config: DetectionConfig) -> Self {
        let strategies = default_strategies(&config);
        Self { config, strategies }
    }

    /// Detector using only the given strategies.
    pub fn with_strategies(config: DetectionConfig, strategies: Vec<Box<dyn MaskStrategy>>) -> Self {
        Self { config, strategies }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Candidate boundary polygons whose enclosed area exceeds the minimum.
    /// Order follows contour extraction and carries no meaning.
    pub fn detect(&self, image: &RasterImage) -> Result<Vec<Polygon>> {
        Ok(self.detect_with_diagnostics(image)?.polygons)
    }

    #[instrument(level = "debug", skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn detect_with_diagnostics(&self, image: &RasterImage) -> Result<Detection> {
        let start = Instant::now();

        let frame = prepare_frame(image, &self.config.preprocess)?;
        let (fused, masks) = self.fuse_masks(&frame)?;
        let fused_pixels = core::count_non_zero(&fused)?;

        let closed = self.close_gaps(&fused)?;
        let closed_pixels = core::count_non_zero(&closed)?;

        let mut contours = Vector::<Vector<CvPoint>>::new();
        imgproc::find_contours(
            &closed,
            &mut contours,
            imgproc::RETR_EXTERNAL,
            imgproc::CHAIN_APPROX_NONE,
            CvPoint::new(0, 0),
        )?;
        let raw_contours = contours.len();

        let polygons: Vec<Polygon> = contours
            .iter()
            .map(|c| polygon_from_cv(&c))
            .filter(|p| shoelace_area(p) > self.config.min_contour_area)
            .collect();

        let processing_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        debug!(
            fused_pixels,
            closed_pixels,
            raw_contours,
            kept = polygons.len(),
            processing_time_ms,
            "Boundary detection complete"
        );

        Ok(Detection {
            polygons,
            masks,
            fused_pixels,
            closed_pixels,
            raw_contours,
            processing_time_ms,
        })
    }

    /// Bitwise OR of every non-empty strategy mask.
    fn fuse_masks(&self, frame: &PreparedFrame) -> Result<(Mat, Vec<MaskStats>)> {
        let mut fused = Mat::zeros(frame.rows(), frame.cols(), core::CV_8UC1)?.to_mat()?;
        let mut stats = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let Some(mask) = strategy.produce(frame)? else {
                debug!(strategy = strategy.name(), "Mask strategy not applicable");
                stats.push(MaskStats {
                    strategy: strategy.name().to_string(),
                    foreground_pixels: None,
                });
                continue;
            };

            let count = core::count_non_zero(&mask)?;
            debug!(strategy = strategy.name(), foreground_pixels = count, "Mask produced");
            stats.push(MaskStats {
                strategy: strategy.name().to_string(),
                foreground_pixels: Some(count),
            });
            if count == 0 {
                continue;
            }

            let mut merged = Mat::default();
            core::bitwise_or_def(&fused, &mask, &mut merged)?;
            fused = merged;
        }

        Ok((fused, stats))
    }

    /// Dilate then morphologically close to bridge small stroke gaps.
    fn close_gaps(&self, mask: &Mat) -> Result<Mat> {
        let kernel = imgproc::get_structuring_element(
            imgproc::MORPH_RECT,
            Size::new(self.config.kernel_size, self.config.kernel_size),
            CvPoint::new(-1, -1),
        )?;

        let mut dilated = Mat::default();
        imgproc::dilate(
            mask,
            &mut dilated,
            &kernel,
            CvPoint::new(-1, -1),
            self.config.dilate_iterations,
            core::BORDER_CONSTANT,
            imgproc::morphology_default_border_value()?,
        )?;

        let mut closed = Mat::default();
        imgproc::morphology_ex(
            &dilated,
            &mut closed,
            imgproc::MORPH_CLOSE,
            &kernel,
            CvPoint::new(-1, -1),
            self.config.close_iterations,
            core::BORDER_CONSTANT,
            imgproc::morphology_default_border_value()?,
        )?;

        Ok(closed)
    }
}

impl Default for BoundaryDetector {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    fn draw_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, thickness: u32, color: Rgb<u8>) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                let on_edge = x < x0 + thickness
                    || x + thickness > x1
                    || y < y0 + thickness
                    || y + thickness > y1;
                if on_edge {
                    img.put_pixel(x, y, color);
                }
            }
        }
    }

    #[test]
    fn test_blank_image_has_no_boundaries() {
        let raster = RasterImage::from_rgb(blank(120, 90)).unwrap();
        let detection = BoundaryDetector::default().detect_with_diagnostics(&raster).unwrap();

        assert!(detection.polygons.is_empty());
        assert_eq!(detection.fused_pixels, 0);
        assert_eq!(detection.masks.len(), 3);
    }

    #[test]
    fn test_rectangle_outline_is_detected() {
        let mut img = blank(200, 160);
        draw_rect(&mut img, 40, 30, 160, 130, 3, Rgb([0, 0, 255]));
        let raster = RasterImage::from_rgb(img).unwrap();

        let polygons = BoundaryDetector::default().detect(&raster).unwrap();
        let largest = polygons
            .iter()
            .map(shoelace_area)
            .fold(0.0, f64::max);

        // Outer contour of a 121x101 outline, grown a few pixels by dilation.
        assert!(largest > 110.0 * 90.0, "largest area {largest}");
        assert!(largest < 140.0 * 120.0, "largest area {largest}");
    }

    #[test]
    fn test_tiny_specks_are_filtered() {
        let mut img = blank(100, 100);
        img.put_pixel(50, 50, Rgb([0, 0, 0]));
        let raster = RasterImage::from_rgb(img).unwrap();

        let config = DetectionConfig {
            min_contour_area: 500.0,
            ..DetectionConfig::default()
        };
        let detection = BoundaryDetector::new(config).detect_with_diagnostics(&raster).unwrap();
        assert!(detection.polygons.is_empty());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_detection_is_quiet_at_info_level() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(move || writer.clone())
            .finish();

        let mut img = blank(200, 160);
        draw_rect(&mut img, 40, 30, 160, 130, 3, Rgb([0, 0, 255]));
        let raster = RasterImage::from_rgb(img).unwrap();
        let detection = tracing::subscriber::with_default(subscriber, || {
            BoundaryDetector::default().detect_with_diagnostics(&raster).unwrap()
        });

        assert!(!detection.polygons.is_empty());
        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.is_empty(), "unexpected info output: {output}");
    }

    #[test]
    fn test_custom_strategy_set() {
        let strategies: Vec<Box<dyn MaskStrategy>> = vec![Box::new(super::super::masks::EdgeMask {
            low: 50.0,
            high: 150.0,
            aperture: 3,
        })];
        let detector = BoundaryDetector::with_strategies(DetectionConfig::default(), strategies);
        assert_eq!(detector.strategy_names(), vec!["edge"]);
    }
}
