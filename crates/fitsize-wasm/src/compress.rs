//! Size-constrained compression WASM bindings.
//!
//! Runs the whole two-stage search inside the worker that calls it. Progress
//! lines go to the optional callback, or to the browser console when none is
//! given.
//!
//! # Example
//!
//! ```typescript
//! import { compress_to_target } from '@fitsize/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_to_target(bytes, 200, undefined, undefined, (msg) => {
//!   postMessage({ type: 'progress', msg });
//! });
//! const blob = new Blob([result.bytes()], { type: 'image/jpeg' });
//! ```

use crate::types::JsCompressedImage;
use fitsize_core::compress::{CompressError, ProgressEvent};
use fitsize_core::{compress_bytes, SearchParameters, TargetBudget};
use wasm_bindgen::prelude::*;

/// Fit encoded image `bytes` under `target_kb` kilobytes as JPEG.
///
/// `initial_quality` and `min_width` default to 75 and 600.
///
/// # Errors
///
/// Throws an `Error` whose `name` is the failure kind (`decode`, `resample`, `encode`,
/// `unreachable_target`, `invalid_parameters`) and whose message is
/// human-readable.
#[wasm_bindgen]
pub fn compress_to_target(
    bytes: &[u8],
    target_kb: u32,
    initial_quality: Option<u8>,
    min_width: Option<u32>,
    on_progress: Option<js_sys::Function>,
) -> Result<JsCompressedImage, JsValue> {
    let params = params_from(initial_quality, min_width);
    run(bytes, target_kb, &params, on_progress)
}

/// Like [`compress_to_target`], with every search parameter taken from a JS
/// object (`{ initial_quality, min_width, max_quality, filter }`, all optional).
#[wasm_bindgen]
pub fn compress_with_params(
    bytes: &[u8],
    target_kb: u32,
    params: JsValue,
    on_progress: Option<js_sys::Function>,
) -> Result<JsCompressedImage, JsValue> {
    let params: SearchParameters = if params.is_undefined() || params.is_null() {
        SearchParameters::default()
    } else {
        serde_wasm_bindgen::from_value(params).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    run(bytes, target_kb, &params, on_progress)
}

/// The default search parameters as a plain JS object.
#[wasm_bindgen]
pub fn default_search_parameters() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&SearchParameters::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn run(
    bytes: &[u8],
    target_kb: u32,
    params: &SearchParameters,
    on_progress: Option<js_sys::Function>,
) -> Result<JsCompressedImage, JsValue> {
    let budget = TargetBudget::from_kilobytes(target_kb).map_err(to_js_error)?;

    let mut sink = |event: ProgressEvent| {
        let message = JsValue::from_str(&event.to_string());
        match &on_progress {
            Some(callback) => {
                // A throwing callback must not abort the search.
                let _ = callback.call1(&JsValue::NULL, &message);
            }
            None => web_sys::console::debug_1(&message),
        }
    };

    compress_bytes(bytes, &budget, params, &mut sink)
        .map(JsCompressedImage::from)
        .map_err(to_js_error)
}

fn params_from(initial_quality: Option<u8>, min_width: Option<u32>) -> SearchParameters {
    let mut params = SearchParameters::default();
    if let Some(quality) = initial_quality {
        params.initial_quality = quality;
    }
    if let Some(width) = min_width {
        params.min_width = width;
    }
    params
}

fn to_js_error(err: CompressError) -> JsValue {
    let js_err = js_sys::Error::new(&err.to_string());
    js_err.set_name(err.kind().code());
    js_err.into()
}
