use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, GenericImageView, ImageError, ImageResult};

use crate::crop::CropRegion;

/// Default JPEG quality for saved crops
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Image decoding and region extraction.
pub trait ImageCodec {
    /// Decode fetched bytes into pixels.
    fn decode(&self, bytes: &[u8]) -> ImageResult<DynamicImage>;

    /// Cut `region` out of the original encoded bytes and re-encode it.
    fn extract(&self, bytes: &[u8], region: CropRegion) -> ImageResult<Vec<u8>>;
}

/// Codec backed by the `image` crate that always writes JPEG.
#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    quality: u8,
}

impl JpegCodec {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ImageCodec for JpegCodec {
    fn decode(&self, bytes: &[u8]) -> ImageResult<DynamicImage> {
        image::load_from_memory(bytes)
    }

    fn extract(&self, bytes: &[u8], region: CropRegion) -> ImageResult<Vec<u8>> {
        let source = image::load_from_memory(bytes)?;
        if region.is_empty()
            || region.left + region.size > source.width()
            || region.top + region.size > source.height()
        {
            return Err(ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            )));
        }

        let cropped = source
            .crop_imm(region.left, region.top, region.size, region.size)
            .to_rgb8();

        let mut out = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut out, self.quality).encode_image(&cropped)?;
        Ok(out.into_inner())
    }
}
