//! C Foreign Function Interface for bitprob-rs.
//!
//! Plain functions over caller-owned buffers; no handles, no allocation
//! crosses the boundary.

use std::os::raw::{c_int, c_uchar};

use crate::error::ErrorCode;

/// Bytes needed for `count` fields of `bit_width` bits, or a negative error
/// code.
#[unsafe(no_mangle)]
pub extern "C" fn bitprob_required_bytes(bit_width: u32, count: usize) -> isize {
    match crate::required_bytes(bit_width, count) {
        Ok(n) => isize::try_from(n).unwrap_or(-(i32::from(ErrorCode::InvalidArgument) as isize)),
        Err(e) => -(i32::from(e.code()) as isize),
    }
}

/// Decode `count` fields into `out`.
///
/// Returns `0` on success or an error code.
///
/// # Safety
/// `data` must point to `len` readable bytes (or be null with `len == 0`).
/// `out` must point to `out_len` writable `u32` values (or be null with
/// `out_len == 0`).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bitprob_decode(
    data: *const c_uchar,
    len: usize,
    bit_width: u32,
    count: usize,
    out: *mut u32,
    out_len: usize,
) -> c_int {
    if (data.is_null() && len != 0) || (out.is_null() && out_len != 0) {
        return ErrorCode::InvalidArgument.into();
    }

    let input: &[u8] = if len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(data, len) }
    };
    let output: &mut [u32] = if out_len == 0 {
        &mut []
    } else {
        unsafe { std::slice::from_raw_parts_mut(out, out_len) }
    };

    match crate::decode_into(input, bit_width, count, output) {
        Ok(()) => ErrorCode::Ok.into(),
        Err(e) => e.code().into(),
    }
}
