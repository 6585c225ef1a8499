//! Image resampling for size-search candidates.
//!
//! Provides resize operations using the `image` crate's algorithms.
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{DecodeError, DecodedImage, FilterType};

/// Something that can produce a resized copy of an image.
///
/// The size search only ever asks for exact target dimensions; aspect ratio
/// is the caller's concern (see [`height_for_width`]).
pub trait Resampler {
    /// Produce a copy of `image` scaled to exactly `width` x `height`.
    fn resample(
        &self,
        image: &DecodedImage,
        width: u32,
        height: u32,
        filter: FilterType,
    ) -> Result<DecodedImage, DecodeError>;
}

/// [`Resampler`] backed by `image::imageops::resize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageResampler;

impl Resampler for ImageResampler {
    fn resample(
        &self,
        image: &DecodedImage,
        width: u32,
        height: u32,
        filter: FilterType,
    ) -> Result<DecodedImage, DecodeError> {
        resize(image, width, height, filter)
    }
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` for a zero-sized target and
/// `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// declared dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let view = image
        .as_rgb_view()
        .ok_or_else(|| DecodeError::CorruptedFile("Pixel buffer does not match dimensions".to_string()))?;

    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Resize an image to `width`, deriving the height from the aspect ratio.
pub fn resize_to_width(
    image: &DecodedImage,
    width: u32,
    filter: FilterType,
) -> Result<DecodedImage, DecodeError> {
    let height = height_for_width(image.width, image.height, width);
    resize(image, width, height, filter)
}

/// Height that keeps `src_width:src_height` at the given width.
///
/// Rounded to the nearest pixel and never below 1 for a non-empty source.
pub fn height_for_width(src_width: u32, src_height: u32, width: u32) -> u32 {
    if src_width == 0 || src_height == 0 {
        return 0;
    }

    let height = (width as f64 * src_height as f64 / src_width as f64).round() as u32;
    height.max(1)
}
