use crate::data::RasterImage;
use crate::pipeline::MeasurementResult;
use crate::utils::{polygon_to_cv, raster_to_mat};
use crate::Result;
use image::error::{ImageError, ParameterError, ParameterErrorKind};
use image::RgbImage;
use opencv::core::{self, Mat, Point as CvPoint, Scalar, Vector};
use opencv::imgproc;
use opencv::prelude::*;
use std::path::Path;
use tracing::debug;

/// Colors are RGB.
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    pub boundary_color: [u8; 3],
    pub fill_color: [u8; 3],
    pub fill_opacity: f64,
    pub line_thickness: i32,
    pub text_color: [u8; 3],
    pub font_scale: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            boundary_color: [0, 0, 255],
            fill_color: [0, 255, 0],
            fill_opacity: 0.3,
            line_thickness: 2,
            text_color: [255, 0, 0],
            font_scale: 0.8,
        }
    }
}

fn rgb_scalar(c: [u8; 3]) -> Scalar {
    Scalar::new(f64::from(c[0]), f64::from(c[1]), f64::from(c[2]), 0.0)
}

/// Draw the measured boundary, a translucent fill and the length and area
/// labels over the source image.
pub fn render_overlay(image: &RasterImage, result: &MeasurementResult, style: &OverlayStyle) -> Result<RgbImage> {
    let source = raster_to_mat(image)?;
    let base = if image.is_color() {
        source
    } else {
        let mut rgb = Mat::default();
        imgproc::cvt_color_def(&source, &mut rgb, imgproc::COLOR_GRAY2RGB)?;
        rgb
    };

    let mut canvas = match &result.boundary {
        Some(boundary) if boundary.len() >= 3 => {
            let mut contours = Vector::<Vector<CvPoint>>::new();
            contours.push(polygon_to_cv(boundary));

            let mut filled = base.try_clone()?;
            imgproc::fill_poly(
                &mut filled,
                &contours,
                rgb_scalar(style.fill_color),
                imgproc::LINE_8,
                0,
                CvPoint::new(0, 0),
            )?;

            let mut blended = Mat::default();
            core::add_weighted(
                &base,
                1.0 - style.fill_opacity,
                &filled,
                style.fill_opacity,
                0.0,
                &mut blended,
                -1,
            )?;

            imgproc::draw_contours(
                &mut blended,
                &contours,
                -1,
                rgb_scalar(style.boundary_color),
                style.line_thickness,
                imgproc::LINE_8,
                &Mat::default(),
                i32::MAX,
                CvPoint::new(0, 0),
            )?;
            blended
        }
        _ => base,
    };

    let labels = [
        format!("Length: {:.2} {}", result.length, result.unit),
        format!("Area: {:.2} sq {}", result.area, result.unit),
    ];
    for (i, label) in labels.iter().enumerate() {
        imgproc::put_text(
            &mut canvas,
            label,
            CvPoint::new(10, 30 + 30 * i as i32),
            imgproc::FONT_HERSHEY_SIMPLEX,
            style.font_scale,
            rgb_scalar(style.text_color),
            2,
            imgproc::LINE_AA,
            false,
        )?;
    }

    mat_to_rgb(&canvas)
}

/// Copy a 3-channel RGB matrix into an owned image buffer.
fn mat_to_rgb(mat: &Mat) -> Result<RgbImage> {
    let (width, height) = (mat.cols() as u32, mat.rows() as u32);
    let bytes = mat.data_bytes()?.to_vec();
    let image = RgbImage::from_raw(width, height, bytes).ok_or_else(|| {
        ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::DimensionMismatch))
    })?;
    Ok(image)
}

/// Render and write the overlay; the format follows the file extension.
pub fn save_overlay<P: AsRef<Path>>(
    image: &RasterImage,
    result: &MeasurementResult,
    style: &OverlayStyle,
    path: P,
) -> Result<()> {
    let overlay = render_overlay(image, result, style)?;
    overlay.save(path.as_ref())?;
    debug!(path = %path.as_ref().display(), "Overlay saved");
    Ok(())
}
