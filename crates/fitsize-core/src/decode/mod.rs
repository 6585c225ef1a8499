//! Image decoding and resampling for fitsize.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG inputs, applying EXIF orientation
//! - Normalizing alpha, gray and palette layouts to opaque RGB
//! - Resampling candidates at a trial width with the aspect ratio preserved
//!
//! # Examples
//!
//! ```ignore
//! use fitsize_core::decode::{decode_file, resize_to_width, FilterType};
//!
//! let source = decode_file("photo.png".as_ref()).unwrap();
//! let smaller = resize_to_width(&source.image, 1200, FilterType::Lanczos3).unwrap();
//! println!("{}x{}", smaller.width, smaller.height);
//! ```

mod resize;
mod source;
mod types;

pub use resize::{height_for_width, resize, resize_to_width, ImageResampler, Resampler};
pub use source::{decode_file, decode_image};
pub use types::{ColorLayout, DecodeError, DecodedImage, FilterType, Orientation, SourceImage};
