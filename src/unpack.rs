//! Bulk decoding of packed fields into renormalized 32-bit values.
//!
//! Fields are stored MSB-first with no padding. Each raw field is
//! left-justified to 32 bits and byte-reversed, which gives consumers reading
//! little-endian words a fixed-point magnitude close to `raw / 2^b`.

use crate::BitWidth;
use crate::bit_reader::BitReader;
use crate::error::UnpackError;

/// Left-justify `raw` to 32 bits and reverse its byte order.
#[inline]
pub fn renormalize(raw: u32, width: BitWidth) -> u32 {
    raw.wrapping_shl(width.justify_shift()).swap_bytes()
}

/// Bytes needed to hold `count` fields of `bit_width` bits.
///
/// Fails with [`UnpackError::SizeOverflow`] when the size is not
/// representable as a `usize`.
pub fn required_bytes(bit_width: u32, count: usize) -> Result<usize, UnpackError> {
    let width = BitWidth::new(bit_width)?;
    let overflow = UnpackError::SizeOverflow { bit_width, count };
    let bits = (count as u64)
        .checked_mul(width.get() as u64)
        .ok_or(overflow)?;
    usize::try_from(bits.div_ceil(8)).map_err(|_| overflow)
}

/// Bits requested by a decode call, capped at `u64::MAX` for error reports.
fn requested_bits(width: BitWidth, count: usize) -> u64 {
    (count as u64).saturating_mul(width.get() as u64)
}

/// Decode `count` fields of `bit_width` bits from `buffer`.
///
/// Bytes past the last consumed one are ignored. On error nothing is
/// returned; a short buffer is reported as [`UnpackError::TruncatedInput`].
pub fn decode(buffer: &[u8], bit_width: u32, count: usize) -> Result<Vec<u32>, UnpackError> {
    let width = BitWidth::new(bit_width)?;
    // No up-front allocation of `count` slots.
    fields(buffer, width, count).collect()
}

/// Like [`decode`], writing into caller storage of exactly `count` values.
///
/// The contents of `out` are unspecified when an error is returned.
pub fn decode_into(
    buffer: &[u8],
    bit_width: u32,
    count: usize,
    out: &mut [u32],
) -> Result<(), UnpackError> {
    let width = BitWidth::new(bit_width)?;
    if out.len() != count {
        return Err(UnpackError::OutputSizeMismatch {
            expected: count,
            actual: out.len(),
        });
    }
    for (slot, value) in out.iter_mut().zip(fields(buffer, width, count)) {
        *slot = value?;
    }
    Ok(())
}

fn fields(
    buffer: &[u8],
    width: BitWidth,
    count: usize,
) -> impl Iterator<Item = Result<u32, UnpackError>> + '_ {
    let needed_bits = requested_bits(width, count);
    log::trace!(
        "decoding {} fields of {} from {} bytes",
        count,
        width,
        buffer.len()
    );

    let mut reader = BitReader::new(buffer);
    (0..count).map(move |_| {
        let raw = reader.read_field(width).map_err(|e| {
            // Report the whole request, not just the field that ran dry.
            let err = match e {
                UnpackError::TruncatedInput { available_bits, .. } => UnpackError::TruncatedInput {
                    needed_bits,
                    available_bits,
                },
                other => other,
            };
            log::debug!("decode failed after {} bits: {}", reader.bits_consumed(), err);
            err
        })?;
        Ok(renormalize(raw, width))
    })
}
