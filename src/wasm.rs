//! WebAssembly bindings for bitprob-rs.
//!
//! This module provides JavaScript-compatible functions via wasm-bindgen
//! for use in browsers and Node.js.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Decode packed fields to renormalized values.
///
/// # Arguments
/// * `data` - The packed block bytes
/// * `bit_width` - Bits per field (1 to 32)
/// * `count` - Number of fields
///
/// # Returns
/// Values as Uint32Array
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn decode(data: &[u8], bit_width: u32, count: usize) -> Result<Vec<u32>, JsValue> {
    crate::decode(data, bit_width, count).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode packed fields straight to probabilities in `[0, 1]`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn decode_probabilities(data: &[u8], bit_width: u32, count: usize) -> Result<Vec<f64>, JsValue> {
    let width =
        crate::BitWidth::new(bit_width).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let values = decode(data, bit_width, count)?;
    Ok(crate::probability::probabilities(&values, width))
}

/// Bytes needed for `count` fields of `bit_width` bits.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn required_bytes(bit_width: u32, count: usize) -> Result<usize, JsValue> {
    crate::required_bytes(bit_width, count).map_err(|e| JsValue::from_str(&e.to_string()))
}
