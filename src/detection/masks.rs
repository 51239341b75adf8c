use super::PreparedFrame;
use crate::config::{DetectionConfig, HsvRange};
use crate::Result;
use opencv::core::{self, Mat, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

/// A strategy producing a binary foreground mask (0 / 255, `CV_8UC1`) from
/// a prepared frame. `None` means the strategy does not apply to this input.
pub trait MaskStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn produce(&self, frame: &PreparedFrame) -> Result<Option<Mat>>;
}

/// Union of HSV ranges for common marker inks. Color input only.
#[derive(Debug, Clone)]
pub struct ColorMask {
    ranges: Vec<HsvRange>,
}

impl ColorMask {
    pub fn new(ranges: Vec<HsvRange>) -> Self {
        Self { ranges }
    }
}

impl MaskStrategy for ColorMask {
    fn name(&self) -> &str {
        "color"
    }

    fn produce(&self, frame: &PreparedFrame) -> Result<Option<Mat>> {
        let Some(color) = &frame.color else {
            return Ok(None);
        };

        let mut hsv = Mat::default();
        imgproc::cvt_color_def(color, &mut hsv, imgproc::COLOR_RGB2HSV)?;

        let mut union = Mat::zeros(frame.rows(), frame.cols(), core::CV_8UC1)?.to_mat()?;
        for range in &self.ranges {
            let mut mask = Mat::default();
            core::in_range(&hsv, &hsv_scalar(range.lower), &hsv_scalar(range.upper), &mut mask)?;
            let mut merged = Mat::default();
            core::bitwise_or_def(&union, &mask, &mut merged)?;
            union = merged;
        }
        Ok(Some(union))
    }
}

fn hsv_scalar(v: [u8; 3]) -> Scalar {
    Scalar::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2]), 0.0)
}

/// Canny edges on the enhanced grayscale.
#[derive(Debug, Clone, Copy)]
pub struct EdgeMask {
    pub low: f64,
    pub high: f64,
    pub aperture: i32,
}

impl MaskStrategy for EdgeMask {
    fn name(&self) -> &str {
        "edge"
    }

    fn produce(&self, frame: &PreparedFrame) -> Result<Option<Mat>> {
        let mut edges = Mat::default();
        imgproc::canny(&frame.enhanced, &mut edges, self.low, self.high, self.aperture, false)?;
        Ok(Some(edges))
    }
}

/// Gaussian-weighted local threshold, inverted so dark strokes on a light
/// background become foreground.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveThresholdMask {
    pub block_size: i32,
    pub c: f64,
}

impl MaskStrategy for AdaptiveThresholdMask {
    fn name(&self) -> &str {
        "adaptive_threshold"
    }

    fn produce(&self, frame: &PreparedFrame) -> Result<Option<Mat>> {
        let mut thresh = Mat::default();
        imgproc::adaptive_threshold(
            &frame.enhanced,
            &mut thresh,
            255.0,
            imgproc::ADAPTIVE_THRESH_GAUSSIAN_C,
            imgproc::THRESH_BINARY_INV,
            self.block_size,
            self.c,
        )?;
        Ok(Some(thresh))
    }
}

/// Color, edge and adaptive-threshold strategies configured from `config`.
pub fn default_strategies(config: &DetectionConfig) -> Vec<Box<dyn MaskStrategy>> {
    vec![
        Box::new(ColorMask::new(config.color_ranges.clone())),
        Box::new(EdgeMask {
            low: config.canny_low,
            high: config.canny_high,
            aperture: config.canny_aperture,
        }),
        Box::new(AdaptiveThresholdMask {
            block_size: config.adaptive_block_size,
            c: config.adaptive_c,
        }),
    ]
}
