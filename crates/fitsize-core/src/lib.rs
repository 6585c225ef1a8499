//! fitsize core - fit an image under a file-size budget
//!
//! This crate decodes an input image, normalizes it to opaque RGB and searches
//! for the largest resolution, then the highest JPEG quality, whose encoding
//! stays under a byte ceiling.
//!
//! - [`decode`] - loading, normalization and resampling
//! - [`encode`] - the JPEG encoder behind the [`encode::LossyEncoder`] seam
//! - [`compress`] - the two-stage size search, file pipeline and worker task

pub mod compress;
pub mod decode;
pub mod encode;

pub use compress::{
    compress_file, spawn_compress_file, CompressError, CompressJob, CompressedImage,
    CompressionReport, ErrorKind, ProgressEvent, ProgressSink, SearchParameters,
    SizeConstrainedEncoder, TargetBudget,
};
pub use decode::{decode_file, decode_image, DecodedImage, FilterType};

/// Fit an already decoded image under `budget` with the default JPEG encoder.
///
/// Convenience wrapper around [`SizeConstrainedEncoder::jpeg`].
pub fn compress_image(
    image: &DecodedImage,
    budget: &TargetBudget,
    params: &SearchParameters,
    progress: &mut dyn ProgressSink,
) -> Result<CompressedImage, CompressError> {
    SizeConstrainedEncoder::jpeg().compress(image, budget, params, progress)
}

/// Decode `bytes` and fit the result under `budget`.
pub fn compress_bytes(
    bytes: &[u8],
    budget: &TargetBudget,
    params: &SearchParameters,
    progress: &mut dyn ProgressSink,
) -> Result<CompressedImage, CompressError> {
    let source = decode_image(bytes)?;
    compress_image(&source.image, budget, params, progress)
}
