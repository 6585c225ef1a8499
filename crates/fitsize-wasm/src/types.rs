//! WASM-compatible wrapper types for image data.
//!
//! These types wrap the core fitsize types and handle the conversion between
//! Rust and JavaScript data representations.

use fitsize_core::decode::{DecodedImage, FilterType};
use fitsize_core::CompressedImage;
use wasm_bindgen::prelude::*;

/// A decoded RGB image held in WASM memory.
///
/// `pixels()` copies the data out to a `Uint8Array`; keep the image in WASM
/// memory between calls where possible.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and RGB pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Borrow-free conversion for core calls. Clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Result of a size-constrained compression.
#[wasm_bindgen]
pub struct JsCompressedImage {
    width: u32,
    height: u32,
    quality: u8,
    data: Vec<u8>,
}

#[wasm_bindgen]
impl JsCompressedImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// JPEG quality the bytes were encoded at.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.quality
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.data.len()
    }

    /// The JPEG file bytes as Uint8Array (a copy).
    pub fn bytes(&self) -> Vec<u8> {
        self.data.clone()
    }
}

impl From<CompressedImage> for JsCompressedImage {
    fn from(result: CompressedImage) -> Self {
        Self {
            width: result.width,
            height: result.height,
            quality: result.quality,
            data: result.data,
        }
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Lanczos3, the search default.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        1 => FilterType::Bilinear,
        _ => FilterType::Lanczos3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_decoded_image_roundtrip() {
        let js_img = JsDecodedImage::from_decoded(DecodedImage::new(4, 2, vec![7u8; 24]));
        assert_eq!(js_img.width(), 4);
        assert_eq!(js_img.height(), 2);
        assert_eq!(js_img.byte_length(), 24);

        let decoded = js_img.to_decoded();
        assert_eq!(decoded.pixels, vec![7u8; 24]);
    }

    #[test]
    fn test_compressed_image_from_core() {
        let core = CompressedImage {
            data: vec![0xFF, 0xD8, 0xFF, 0xD9],
            width: 640,
            height: 480,
            quality: 88,
            width_trials: 3,
            quality_trials: 14,
        };
        let js = JsCompressedImage::from(core);
        assert_eq!((js.width(), js.height(), js.quality()), (640, 480, 88));
        assert_eq!(js.byte_length(), 4);
        assert_eq!(js.bytes(), vec![0xFF, 0xD8, 0xFF, 0xD9]);
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), FilterType::Nearest);
        assert_eq!(filter_from_u8(1), FilterType::Bilinear);
        assert_eq!(filter_from_u8(2), FilterType::Lanczos3);
        assert_eq!(filter_from_u8(255), FilterType::Lanczos3);
    }
}
