use crate::error::UnpackError;
use crate::field;
use crate::BitWidth;

/// MSB-first reader over a packed byte buffer.
///
/// Bytes are shifted into the low end of `accumulator`; `valid_bits` counts how
/// many of its low bits are still unread. The window never holds more than
/// `32 + 7` bits, so a `u64` keeps every field intact.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    accumulator: u64,
    valid_bits: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            accumulator: 0,
            valid_bits: 0,
        }
    }

    /// Make at least `width` unread bits available, pulling whole bytes.
    pub fn ensure(&mut self, width: BitWidth) -> Result<(), UnpackError> {
        while self.valid_bits < width.get() {
            let Some(&byte) = self.data.get(self.pos) else {
                return Err(UnpackError::TruncatedInput {
                    needed_bits: self.bits_consumed() + width.get() as u64,
                    available_bits: self.data.len() as u64 * 8,
                });
            };
            self.accumulator = self.accumulator.wrapping_shl(8) | byte as u64;
            self.valid_bits += 8;
            self.pos += 1;
        }
        Ok(())
    }

    /// Read one field. Equivalent to `ensure` followed by extraction.
    pub fn read_field(&mut self, width: BitWidth) -> Result<u32, UnpackError> {
        self.ensure(width)?;
        let (raw, remaining) = field::extract(self.accumulator, self.valid_bits, width);
        self.valid_bits = remaining;
        Ok(raw)
    }

    pub fn valid_bits(&self) -> u32 {
        self.valid_bits
    }

    /// Bits handed out as fields so far.
    pub fn bits_consumed(&self) -> u64 {
        self.pos as u64 * 8 - self.valid_bits as u64
    }

    /// Bytes pulled from the buffer so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn has_data(&self) -> bool {
        self.pos < self.data.len() || self.valid_bits > 0
    }
}
