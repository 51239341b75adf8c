use crate::config::PreprocessConfig;
use crate::data::RasterImage;
use crate::utils::raster_to_mat;
use crate::Result;
use opencv::core::{Mat, Size};
use opencv::prelude::*;
use opencv::{imgproc, photo};

/// Inputs shared by every mask strategy.
pub struct PreparedFrame {
    /// Denoised, contrast-equalized grayscale.
    pub enhanced: Mat,
    /// Original RGB pixels, absent for grayscale sources.
    pub color: Option<Mat>,
}

impl PreparedFrame {
    pub fn rows(&self) -> i32 {
        self.enhanced.rows()
    }

    pub fn cols(&self) -> i32 {
        self.enhanced.cols()
    }
}

/// Grayscale conversion, non-local-means denoising and CLAHE.
pub fn prepare_frame(image: &RasterImage, config: &PreprocessConfig) -> Result<PreparedFrame> {
    let mat = raster_to_mat(image)?;

    let (gray, color) = if image.is_color() {
        let mut gray = Mat::default();
        imgproc::cvt_color_def(&mat, &mut gray, imgproc::COLOR_RGB2GRAY)?;
        (gray, Some(mat))
    } else {
        (mat, None)
    };

    let mut denoised = Mat::default();
    photo::fast_nl_means_denoising(
        &gray,
        &mut denoised,
        config.denoise_strength,
        config.denoise_template_window,
        config.denoise_search_window,
    )?;

    // CLAHE carries internal buffers, so each call builds its own.
    let mut clahe = imgproc::create_clahe(
        config.clahe_clip_limit,
        Size::new(config.clahe_tile_grid, config.clahe_tile_grid),
    )?;
    let mut enhanced = Mat::default();
    clahe.apply(&denoised, &mut enhanced)?;

    Ok(PreparedFrame { enhanced, color })
}
