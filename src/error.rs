use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackError {
    #[error("Invalid bit width {bit_width} (expected 1 to 32)")]
    InvalidBitWidth { bit_width: u32 },
    #[error("Truncated input: needed {needed_bits} bits, only {available_bits} available")]
    TruncatedInput {
        needed_bits: u64,
        available_bits: u64,
    },
    #[error("Output size mismatch: expected {expected} values, got room for {actual}")]
    OutputSizeMismatch { expected: usize, actual: usize },
    #[error("Sample count mismatch: expected {expected}, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },
    #[error("Size overflow: {count} fields of {bit_width} bits do not fit in memory")]
    SizeOverflow { bit_width: u32, count: usize },
}

/// Stable numeric codes, shared by the C and Python bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ErrorCode {
    Ok = 0,
    InvalidBitWidth = 1,
    TruncatedInput = 2,
    OutputSizeMismatch = 3,
    SampleCountMismatch = 4,
    SizeOverflow = 5,

    // Logic errors
    InvalidArgument = 100,
}

impl UnpackError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidBitWidth { .. } => ErrorCode::InvalidBitWidth,
            Self::TruncatedInput { .. } => ErrorCode::TruncatedInput,
            Self::OutputSizeMismatch { .. } => ErrorCode::OutputSizeMismatch,
            Self::SampleCountMismatch { .. } => ErrorCode::SampleCountMismatch,
            Self::SizeOverflow { .. } => ErrorCode::SizeOverflow,
        }
    }
}
