use super::types::*;
use crate::calibration::{ScaleFactor, ScaleSource, ScaleSourceChain, UnitConverter};
use crate::config::MeasureConfig;
use crate::data::RasterImage;
use crate::detection::{BoundaryDetector, Detection};
use crate::error::MeasureError;
use crate::geometry::{ClosurePolicy, GeometryMeasurer, Point, Polygon};
use crate::logging::new_measurement_id;
use crate::Result;
use tracing::{debug, info, info_span};
use uuid::Uuid;

/// Emit at info when the caller asked for debug output, at debug otherwise.
macro_rules! stage_event {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+)
        } else {
            debug!($($arg)+)
        }
    };
}

/// Index of the polygon with the largest enclosed area; the earliest wins ties.
pub fn select_main_boundary(polygons: &[Polygon], measurer: &GeometryMeasurer) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, polygon) in polygons.iter().enumerate() {
        let area = measurer.area(polygon);
        if best.map_or(true, |(_, best_area)| area > best_area) {
            best = Some((i, area));
        }
    }
    best.map(|(i, _)| i)
}

struct AppliedScale {
    factor: ScaleFactor,
    origin: ScaleOrigin,
    note: String,
}

/// Detect, close, measure and calibrate in one call.
///
/// Holds only immutable configuration and stateless strategies, so one
/// instance can be shared across threads behind an `Arc`.
pub struct MeasurementPipeline {
    config: MeasureConfig,
    detector: BoundaryDetector,
    scale_source: Box<dyn ScaleSource>,
    closure: ClosurePolicy,
    measurer: GeometryMeasurer,
}

impl MeasurementPipeline {
    pub fn new(config: MeasureConfig) -> Result<Self> {
        config.validate().map_err(MeasureError::InvalidConfig)?;

        let closure = config.closure.policy();
        let measurer = GeometryMeasurer::new(config.closure.perimeter_policy, closure);
        let detector = BoundaryDetector::new(config.detection.clone());

        Ok(Self {
            config,
            detector,
            scale_source: Box::new(ScaleSourceChain::standard()),
            closure,
            measurer,
        })
    }

    pub fn with_scale_source(mut self, source: impl ScaleSource + 'static) -> Self {
        self.scale_source = Box::new(source);
        self
    }

    pub fn with_detector(mut self, detector: BoundaryDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    pub fn detector(&self) -> &BoundaryDetector {
        &self.detector
    }

    pub fn measurer(&self) -> &GeometryMeasurer {
        &self.measurer
    }

    pub fn detect(&self, image: &RasterImage) -> Result<Vec<Polygon>> {
        self.detector.detect(image)
    }

    /// Measure the largest drawn boundary in `image`.
    ///
    /// An invalid manual reference fails the call even when no boundary is
    /// found, so calibration mistakes never go unnoticed.
    pub fn measure(&self, image: &RasterImage, options: &MeasureOptions) -> Result<MeasurementResult> {
        let id = new_measurement_id();
        let span = info_span!("measurement", measurement_id = %id, source = "image");
        let _enter = span.enter();

        let manual = self.manual_scale(options)?;
        let detection = self.detector.detect_with_diagnostics(image)?;
        self.log_detection(&detection, options.debug);

        if detection.polygons.is_empty() {
            info!("No boundary detected");
            return Ok(MeasurementResult::empty(id));
        }

        let scale = match self.scale_source.detect(image, &detection.polygons)? {
            Some(factor) => {
                stage_event!(
                    options.debug,
                    source = self.scale_source.name(),
                    ppm = factor.pixels_per_meter(),
                    "Scale detected automatically"
                );
                Some(AppliedScale {
                    factor,
                    origin: ScaleOrigin::Automatic,
                    note: note_auto_scale(factor),
                })
            }
            None => manual,
        };

        Ok(self.assemble(id, detection.polygons, scale, options))
    }

    /// Measure a boundary given as points rather than detected in an image.
    /// No automatic scale detection is attempted.
    pub fn measure_points(&self, points: &[Point], options: &MeasureOptions) -> Result<MeasurementResult> {
        let id = new_measurement_id();
        let span = info_span!("measurement", measurement_id = %id, source = "points");
        let _enter = span.enter();

        let manual = self.manual_scale(options)?;
        if points.is_empty() {
            return Ok(MeasurementResult::empty(id));
        }

        let polygon = Polygon::new(points.to_vec());
        Ok(self.assemble(id, vec![polygon], manual, options))
    }

    fn manual_scale(&self, options: &MeasureOptions) -> Result<Option<AppliedScale>> {
        let Some(reference) = &options.reference else {
            return Ok(None);
        };
        let factor = reference.scale()?;
        Ok(Some(AppliedScale {
            factor,
            origin: ScaleOrigin::Manual,
            note: note_manual_scale(reference),
        }))
    }

    fn assemble(
        &self,
        id: Uuid,
        mut candidates: Vec<Polygon>,
        scale: Option<AppliedScale>,
        options: &MeasureOptions,
    ) -> MeasurementResult {
        let candidate_count = candidates.len();
        let main_index = select_main_boundary(&candidates, &self.measurer).unwrap_or(0);
        let mut main = candidates.swap_remove(main_index);

        // Length follows the drawn sequence so the perimeter policy sees open
        // drawings as open. Appending the start point leaves the wrapped
        // length and the area unchanged.
        let pixel_length = self.measurer.length(&main);
        let auto_closed = !self.closure.is_closed(&main);
        if auto_closed {
            main = self.closure.auto_close(main);
        }
        let pixel_area = self.measurer.area(&main);
        stage_event!(
            options.debug,
            candidates = candidate_count,
            main_index,
            points = main.len(),
            auto_closed,
            pixel_length,
            pixel_area,
            "Main boundary measured"
        );

        let mut notes = Vec::new();
        if auto_closed {
            notes.push(NOTE_AUTO_CLOSED.to_string());
        }
        if candidate_count > 1 {
            notes.push(note_multiple_segments(candidate_count));
        }

        let mut result = MeasurementResult {
            measurement_id: id,
            length: pixel_length,
            area: pixel_area,
            unit: MeasurementUnit::Pixels,
            notes,
            pixel_length,
            pixel_area,
            scale: None,
            scale_origin: None,
            candidates: candidate_count,
            auto_closed,
            boundary: Some(main),
            area_units: None,
            length_units: None,
        };

        match scale {
            Some(applied) => {
                let factor = applied.factor;
                result.length = factor.to_meters(pixel_length);
                result.area = factor.to_square_meters(pixel_area);
                result.unit = MeasurementUnit::Meters;
                result.scale = Some(factor);
                result.scale_origin = Some(applied.origin);
                result.notes.push(applied.note);
                if options.expand_units {
                    result.area_units = Some(UnitConverter::area_to_all_units(result.area));
                    result.length_units = Some(factor.distance_to_all_units(pixel_length));
                }
            }
            None => result.notes.push(NOTE_NO_SCALE.to_string()),
        }

        info!(
            length = result.length,
            area = result.area,
            unit = %result.unit,
            "Measurement complete"
        );
        result
    }

    fn log_detection(&self, detection: &Detection, verbose: bool) {
        for mask in &detection.masks {
            stage_event!(
                verbose,
                strategy = %mask.strategy,
                foreground_pixels = ?mask.foreground_pixels,
                "Mask stage"
            );
        }
        stage_event!(
            verbose,
            fused_pixels = detection.fused_pixels,
            closed_pixels = detection.closed_pixels,
            raw_contours = detection.raw_contours,
            candidates = detection.polygons.len(),
            "Detection stage"
        );
    }
}

impl std::fmt::Debug for MeasurementPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasurementPipeline")
            .field("config", &self.config)
            .field("strategies", &self.detector.strategy_names())
            .field("scale_source", &self.scale_source.name())
            .finish()
    }
}
