//! Automatic scale detection hooks.
//!
//! Each [`ScaleSource`] inspects the raster and the detected boundaries and
//! may report a pixels-per-meter factor. None of the shipped sources can read
//! real-world lengths off an image, so a default chain always comes back
//! empty and the caller falls through to a manual reference.

use super::scale::ScaleFactor;
use super::units::LengthUnit;
use crate::data::RasterImage;
use crate::geometry::{open_length, shoelace_area, Polygon};
use crate::Result;
use std::f64::consts::PI;
use tracing::debug;

/// Strategy that may derive a scale factor from image content.
pub trait ScaleSource: Send + Sync {
    fn name(&self) -> &str;

    fn detect(&self, image: &RasterImage, polygons: &[Polygon]) -> Result<Option<ScaleFactor>>;
}

/// Always reports "not found".
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAutoScale;

impl ScaleSource for NoAutoScale {
    fn name(&self) -> &str {
        "none"
    }

    fn detect(&self, _image: &RasterImage, _polygons: &[Polygon]) -> Result<Option<ScaleFactor>> {
        Ok(None)
    }
}

/// A scale annotation read from the image, e.g. a bar labelled "10 m"
/// spanning 240 pixels gives 24 pixels per unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleLabel {
    pub pixels_per_unit: f64,
    pub unit: LengthUnit,
}

impl ScaleLabel {
    pub fn pixels_per_meter(&self) -> Result<ScaleFactor> {
        ScaleFactor::new(self.pixels_per_unit / self.unit.meters_per_unit())
    }
}

/// Text-reading backend (OCR) for scale labels.
pub trait LabelReader: Send + Sync {
    fn read_label(&self, image: &RasterImage) -> Result<Option<ScaleLabel>>;
}

/// Converts a label reading into pixels per meter. Without a reader it
/// never finds anything.
#[derive(Default)]
pub struct LabelScaleSource {
    reader: Option<Box<dyn LabelReader>>,
}

impl LabelScaleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reader(reader: impl LabelReader + 'static) -> Self {
        Self {
            reader: Some(Box::new(reader)),
        }
    }
}

impl ScaleSource for LabelScaleSource {
    fn name(&self) -> &str {
        "label"
    }

    fn detect(&self, image: &RasterImage, _polygons: &[Polygon]) -> Result<Option<ScaleFactor>> {
        let Some(reader) = &self.reader else {
            return Ok(None);
        };
        match reader.read_label(image)? {
            Some(label) => label.pixels_per_meter().map(Some),
            None => Ok(None),
        }
    }
}

/// Looks for thin straight strokes that could be a drawn reference line.
///
/// Finding the stroke is as far as it goes: the real length it stands for
/// is not readable from pixels, so the source reports candidates in the log
/// and returns no scale.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceLineScaleSource {
    pub max_compactness: f64,
    pub min_area: f64,
    pub min_aspect_ratio: f64,
}

impl Default for ReferenceLineScaleSource {
    fn default() -> Self {
        Self {
            max_compactness: 0.1,
            min_area: 20.0,
            min_aspect_ratio: 3.0,
        }
    }
}

impl ReferenceLineScaleSource {
    /// Indices of polygons shaped like a straight reference stroke.
    pub fn candidates(&self, polygons: &[Polygon]) -> Vec<usize> {
        polygons
            .iter()
            .enumerate()
            .filter(|(_, polygon)| self.is_line_like(polygon))
            .map(|(i, _)| i)
            .collect()
    }

    fn is_line_like(&self, polygon: &Polygon) -> bool {
        let perimeter = open_length(polygon);
        if perimeter <= 0.0 {
            return false;
        }
        let area = shoelace_area(polygon);
        // 1.0 for a circle, near 0 for a sliver
        let compactness = 4.0 * PI * area / (perimeter * perimeter);
        if compactness >= self.max_compactness || area <= self.min_area {
            return false;
        }
        polygon
            .bounding_box()
            .is_some_and(|bbox| bbox.aspect_ratio() > self.min_aspect_ratio)
    }
}

impl ScaleSource for ReferenceLineScaleSource {
    fn name(&self) -> &str {
        "reference_line"
    }

    fn detect(&self, _image: &RasterImage, polygons: &[Polygon]) -> Result<Option<ScaleFactor>> {
        let candidates = self.candidates(polygons);
        if !candidates.is_empty() {
            debug!(
                candidates = ?candidates,
                "Found reference line candidates without a known real length"
            );
        }
        Ok(None)
    }
}

/// Tries each source in order; the first scale found wins.
pub struct ScaleSourceChain {
    sources: Vec<Box<dyn ScaleSource>>,
}

impl Default for ScaleSourceChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScaleSourceChain {
    pub fn empty() -> Self {
        Self { sources: Vec::new() }
    }

    /// Label reading first, then reference-line search.
    pub fn standard() -> Self {
        Self::empty()
            .with_source(LabelScaleSource::new())
            .with_source(ReferenceLineScaleSource::default())
    }

    pub fn with_source(mut self, source: impl ScaleSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ScaleSource for ScaleSourceChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn detect(&self, image: &RasterImage, polygons: &[Polygon]) -> Result<Option<ScaleFactor>> {
        for source in &self.sources {
            if let Some(scale) = source.detect(image, polygons)? {
                debug!(
                    source = source.name(),
                    pixels_per_meter = scale.pixels_per_meter(),
                    "Scale detected automatically"
                );
                return Ok(Some(scale));
            }
        }
        Ok(None)
    }
}
