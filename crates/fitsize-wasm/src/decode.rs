//! Image decoding WASM bindings.
//!
//! - [`decode_image`] - Decode JPEG/PNG bytes to opaque RGB
//! - [`resize`] - Resize an image to exact dimensions
//! - [`resize_to_width`] - Resize to a width, keeping the aspect ratio
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, resize_to_width } from '@fitsize/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const preview = resize_to_width(image, 1200, 2); // Lanczos3 filter
//! ```

use crate::types::{filter_from_u8, JsDecodedImage};
use fitsize_core::decode;
use wasm_bindgen::prelude::*;

/// Decode image bytes, applying EXIF orientation and dropping any alpha channel.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(|source| JsDecodedImage::from_decoded(source.image))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image to exact dimensions.
///
/// `filter`: 0=Nearest, 1=Bilinear, 2=Lanczos3.
#[wasm_bindgen]
pub fn resize(
    image: &JsDecodedImage,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    decode::resize(&image.to_decoded(), width, height, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Resize an image to `width`, rounding the height to keep the aspect ratio.
#[wasm_bindgen]
pub fn resize_to_width(
    image: &JsDecodedImage,
    width: u32,
    filter: u8,
) -> Result<JsDecodedImage, JsValue> {
    decode::resize_to_width(&image.to_decoded(), width, filter_from_u8(filter))
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_image_invalid() {
        assert!(decode_image(&[0x00, 0x01, 0x02]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_resize_to_width_keeps_ratio() {
        let img = JsDecodedImage::new(200, 100, vec![128u8; 200 * 100 * 3]);
        let out = resize_to_width(&img, 50, 1).unwrap();
        assert_eq!((out.width(), out.height()), (50, 25));
    }

    #[wasm_bindgen_test]
    fn test_resize_zero_width_errors() {
        let img = JsDecodedImage::new(10, 10, vec![0u8; 300]);
        assert!(resize(&img, 0, 10, 0).is_err());
    }
}
