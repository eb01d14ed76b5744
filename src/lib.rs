pub mod bit_reader;
pub mod error;
pub mod field;
pub mod probability;
pub mod unpack;

#[cfg(feature = "ffi")]
pub mod ffi;
pub mod wasm;

pub use error::{ErrorCode, UnpackError};
pub use unpack::{decode, decode_into, renormalize, required_bytes};

/// Number of bits per packed field, validated to `1..=32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitWidth(u8);

impl BitWidth {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 32;

    pub fn new(bits: u32) -> Result<Self, UnpackError> {
        if (Self::MIN..=Self::MAX).contains(&bits) {
            Ok(Self(bits as u8))
        } else {
            Err(UnpackError::InvalidBitWidth { bit_width: bits })
        }
    }

    pub fn get(self) -> u32 {
        self.0 as u32
    }

    /// Mask selecting the low `b` bits.
    pub fn field_mask(self) -> u64 {
        (1u64 << self.0) - 1
    }

    /// Largest raw value a field can hold, `2^b - 1`.
    pub fn max_raw(self) -> u32 {
        self.field_mask() as u32
    }

    /// Left shift that justifies a raw field to 32 bits.
    pub fn justify_shift(self) -> u32 {
        Self::MAX - self.get()
    }
}

impl std::convert::TryFrom<u32> for BitWidth {
    type Error = UnpackError;
    fn try_from(v: u32) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl std::convert::TryFrom<u8> for BitWidth {
    type Error = UnpackError;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Self::new(v as u32)
    }
}

impl std::fmt::Display for BitWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bits", self.0)
    }
}
