use thiserror::Error;

/// A malformed UTF-8 sequence found while scanning host-provided text.
///
/// Decode errors are never fatal: measurement degrades to an empty result
/// and trimming degrades to an absent span, with the error reported through
/// the [`log`] facade.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The first byte of the sequence is not a valid UTF-8 leading byte.
    #[error("invalid leading byte 0x{0:02x}")]
    InvalidLeadingByte(u8),
    /// A byte inside a multi-byte sequence is not a continuation byte.
    #[error("invalid continuation byte 0x{0:02x}")]
    InvalidContinuation(u8),
    /// The input ended in the middle of a multi-byte sequence.
    #[error("truncated multi-byte sequence")]
    Truncated,
    /// A code point was encoded in more bytes than it needs.
    #[error("overlong encoding of U+{0:04X}")]
    Overlong(u32),
    /// The decoded value is a surrogate half or lies above U+10FFFF.
    #[error("U+{0:04X} is not a Unicode scalar value")]
    OutOfRange(u32),
}

/// Allocation failed while sizing a fragment buffer.
///
/// The generator that hit this aborts its single call without touching host
/// state; the host may simply call again.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("out of memory")]
pub struct OutOfMemory;
