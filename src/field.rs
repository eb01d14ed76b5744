//! Field extraction from the reader's bit window.

use crate::BitWidth;

/// Remove the top `width` bits of the valid window.
///
/// `accumulator` holds `valid_bits` meaningful bits in its low end; anything
/// above them is stale and never read. Returns the raw field and the number of
/// valid bits left.
///
/// The caller guarantees `valid_bits >= width`.
#[inline]
pub fn extract(accumulator: u64, valid_bits: u32, width: BitWidth) -> (u32, u32) {
    debug_assert!(valid_bits >= width.get());
    let remaining = valid_bits - width.get();
    let raw = (accumulator >> remaining) & width.field_mask();
    (raw as u32, remaining)
}
