use crate::data::{Channels, RasterImage};
use crate::geometry::{Point, Polygon};
use crate::Result;
use opencv::core::{self, Mat, Point as CvPoint, Vector};
use opencv::prelude::*;

/// Copy a raster into an OpenCV matrix (`CV_8UC1` or `CV_8UC3`, RGB order).
pub fn raster_to_mat(image: &RasterImage) -> Result<Mat> {
    let typ = match image.channels() {
        Channels::Gray => core::CV_8UC1,
        Channels::Rgb => core::CV_8UC3,
    };
    let mut mat = Mat::zeros(image.height() as i32, image.width() as i32, typ)?.to_mat()?;
    mat.data_bytes_mut()?.copy_from_slice(image.data());
    Ok(mat)
}

pub fn polygon_from_cv(contour: &Vector<CvPoint>) -> Polygon {
    contour.iter().map(|p| Point::new(p.x, p.y)).collect()
}

pub fn polygon_to_cv(polygon: &Polygon) -> Vector<CvPoint> {
    polygon
        .points()
        .iter()
        .map(|p| CvPoint::new(p.x, p.y))
        .collect()
}
