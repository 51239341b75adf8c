use super::RasterImage;
use crate::error::MeasureError;
use std::path::Path;

/// Decodes an image file into a raster. Any decode failure is reported as
/// [`MeasureError::InputUnavailable`].
pub fn load_raster<P: AsRef<Path>>(path: P) -> crate::Result<RasterImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| {
        MeasureError::InputUnavailable(format!("could not decode {}: {e}", path.display()))
    })?;
    RasterImage::from_dynamic(img)
}

/// Decodes in-memory image bytes, e.g. an uploaded file body.
pub fn decode_raster(bytes: &[u8]) -> crate::Result<RasterImage> {
    if bytes.is_empty() {
        return Err(MeasureError::InputUnavailable("image data is empty".to_string()));
    }
    let img = image::load_from_memory(bytes)
        .map_err(|e| MeasureError::InputUnavailable(format!("could not decode image bytes: {e}")))?;
    RasterImage::from_dynamic(img)
}
