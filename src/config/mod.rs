use crate::geometry::{ClosurePolicy, PerimeterPolicy, DEFAULT_CLOSURE_THRESHOLD_PX};
use crate::logging::LoggingConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MeasureConfig {
    pub detection: DetectionConfig,
    pub closure: ClosureConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub preprocess: PreprocessConfig,
    pub color_ranges: Vec<HsvRange>,
    pub canny_low: f64,
    pub canny_high: f64,
    pub canny_aperture: i32,
    pub adaptive_block_size: i32,
    pub adaptive_c: f64,
    pub kernel_size: i32,
    pub dilate_iterations: i32,
    pub close_iterations: i32,
    pub min_contour_area: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub denoise_strength: f32,
    pub denoise_template_window: i32,
    pub denoise_search_window: i32,
    pub clahe_clip_limit: f64,
    pub clahe_tile_grid: i32,
}

/// Inclusive HSV box on OpenCV's 8-bit scale (hue 0-180).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    pub name: String,
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn new(name: &str, lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            lower,
            upper,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosureConfig {
    pub threshold_px: f64,
    pub perimeter_policy: PerimeterPolicy,
}

impl ClosureConfig {
    pub fn policy(&self) -> ClosurePolicy {
        ClosurePolicy::new(self.threshold_px)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            preprocess: PreprocessConfig::default(),
            color_ranges: default_marker_ranges(),
            canny_low: 50.0,
            canny_high: 150.0,
            canny_aperture: 3,
            adaptive_block_size: 11,
            adaptive_c: 2.0,
            kernel_size: 3,
            dilate_iterations: 2,
            close_iterations: 3,
            min_contour_area: 50.0,
        }
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            denoise_strength: 10.0,
            denoise_template_window: 7,
            denoise_search_window: 21,
            clahe_clip_limit: 2.0,
            clahe_tile_grid: 8,
        }
    }
}

impl Default for ClosureConfig {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_CLOSURE_THRESHOLD_PX,
            perimeter_policy: PerimeterPolicy::default(),
        }
    }
}

/// Blue, red (both ends of the hue circle), green and near-black marker inks.
pub fn default_marker_ranges() -> Vec<HsvRange> {
    vec![
        HsvRange::new("blue", [100, 50, 50], [130, 255, 255]),
        HsvRange::new("red", [0, 50, 50], [10, 255, 255]),
        HsvRange::new("red", [170, 50, 50], [180, 255, 255]),
        HsvRange::new("green", [40, 50, 50], [80, 255, 255]),
        HsvRange::new("dark", [0, 0, 0], [180, 255, 50]),
    ]
}

impl MeasureConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;

        if content.trim_start().starts_with('{') {
            serde_json::from_str(&content).context("parsing JSON config")
        } else {
            toml::from_str(&content).context("parsing TOML config")
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P, format: ConfigFormat) -> anyhow::Result<()> {
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        fs::write(path.as_ref(), content)
            .with_context(|| format!("writing config {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let det = &self.detection;

        if det.canny_low < 0.0 || det.canny_low >= det.canny_high {
            errors.push("Canny low threshold must be non-negative and below the high threshold".to_string());
        }

        if !matches!(det.canny_aperture, 3 | 5 | 7) {
            errors.push("Canny aperture must be 3, 5 or 7".to_string());
        }

        if det.adaptive_block_size < 3 || det.adaptive_block_size % 2 == 0 {
            errors.push("Adaptive threshold block size must be odd and at least 3".to_string());
        }

        if det.kernel_size < 1 || det.kernel_size % 2 == 0 {
            errors.push("Morphology kernel size must be odd and positive".to_string());
        }

        if det.dilate_iterations < 0 || det.close_iterations < 0 {
            errors.push("Morphology iteration counts must be non-negative".to_string());
        }

        if det.min_contour_area < 0.0 {
            errors.push("Minimum contour area must be non-negative".to_string());
        }

        let pre = &det.preprocess;
        if pre.denoise_strength < 0.0 {
            errors.push("Denoise strength must be non-negative".to_string());
        }
        if pre.denoise_template_window % 2 == 0 || pre.denoise_search_window % 2 == 0 {
            errors.push("Denoise windows must be odd".to_string());
        }
        if pre.clahe_clip_limit <= 0.0 || pre.clahe_tile_grid < 1 {
            errors.push("CLAHE clip limit and tile grid must be positive".to_string());
        }

        for range in &det.color_ranges {
            let ordered = range.lower.iter().zip(range.upper.iter()).all(|(lo, hi)| lo <= hi);
            if !ordered {
                errors.push(format!("HSV range '{}' has a lower bound above its upper bound", range.name));
            }
            if range.upper[0] > 180 {
                errors.push(format!("HSV range '{}' hue exceeds 180", range.name));
            }
        }

        if !(self.closure.threshold_px > 0.0) {
            errors.push("Closure threshold must be positive".to_string());
        }

        if let Err(e) = self.logging.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    Json,
    Toml,
}

pub fn load_config_or_default(config_path: Option<&Path>) -> MeasureConfig {
    let Some(path) = config_path else {
        return MeasureConfig::default();
    };

    match MeasureConfig::load_from_file(path) {
        Ok(config) => match config.validate() {
            Ok(()) => config,
            Err(errors) => {
                for error in &errors {
                    tracing::warn!(error = %error, "Configuration validation error");
                }
                tracing::warn!("Using default configuration instead");
                MeasureConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
            MeasureConfig::default()
        }
    }
}
