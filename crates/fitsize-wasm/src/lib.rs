//! fitsize WASM - WebAssembly bindings for fitsize
//!
//! This crate exposes the fitsize-core functionality to JavaScript/TypeScript,
//! typically from a Web Worker so the page stays responsive while the search
//! runs.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data and results
//! - `decode` - Decoding and resizing bindings
//! - `encode` - Fixed-quality JPEG encoding bindings
//! - `compress` - Size-constrained compression
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_to_target } from '@fitsize/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_to_target(bytes, 200);
//! console.log(`${result.width}x${result.height} q${result.quality}, ${result.byte_length} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod compress;
mod decode;
mod encode;
mod types;

pub use compress::{compress_to_target, compress_with_params, default_search_parameters};
pub use decode::{decode_image, resize, resize_to_width};
pub use encode::{encode_jpeg, encode_jpeg_from_image};
pub use types::{JsCompressedImage, JsDecodedImage};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
