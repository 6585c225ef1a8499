//! Lossy encoding for fitsize.
//!
//! The size search treats the encoder as an opaque capability: pixels and a
//! quality level in, a byte buffer of known length out. [`LossyEncoder`] is
//! that seam; [`JpegQualityEncoder`] is the production implementation.
//!
//! # Examples
//!
//! ```ignore
//! use fitsize_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 90).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError, JpegQualityEncoder, LossyEncoder};
