use crate::error::MeasureError;
use crate::Result;
use image::{DynamicImage, GrayImage, RgbImage};

/// Channel layout of a [`RasterImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Gray = 1,
    Rgb = 3,
}

impl Channels {
    pub fn count(self) -> usize {
        self as usize
    }
}

/// Decoded 8-bit pixel matrix, row-major and channel-interleaved.
///
/// The measurement core only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MeasureError::InputUnavailable(format!(
                "image has no pixels: {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * channels.count();
        if data.len() != expected {
            return Err(MeasureError::InputUnavailable(format!(
                "pixel buffer holds {} bytes, {width}x{height}x{} needs {expected}",
                data.len(),
                channels.count()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn from_gray(image: GrayImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height, Channels::Gray, image.into_raw())
    }

    pub fn from_rgb(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height, Channels::Rgb, image.into_raw())
    }

    /// Grayscale sources stay single-channel; everything else becomes RGB.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        match image {
            DynamicImage::ImageLuma8(gray) => Self::from_gray(gray),
            other if other.color().channel_count() <= 2 => Self::from_gray(other.to_luma8()),
            other => Self::from_rgb(other.to_rgb8()),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn is_color(&self) -> bool {
        self.channels == Channels::Rgb
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Channel values of one pixel, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let n = self.channels.count();
        let start = (y as usize * self.width as usize + x as usize) * n;
        self.data.get(start..start + n)
    }
}
