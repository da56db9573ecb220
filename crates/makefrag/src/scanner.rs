//! One-codepoint-at-a-time UTF-8 scanner.
//!
//! The scanner decodes exactly one scalar from the start of a byte slice and
//! reports its encoded length, so that the measurement layer can walk a
//! string in a single forward pass without re-validating bytes it already
//! consumed. Decoding is strict: overlong encodings, surrogate halves and
//! values above U+10FFFF are rejected, matching what a validating UTF-8
//! parser would accept and nothing more.

use crate::error::DecodeError;

/// One decoded scalar and the number of bytes that encoded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CodePoint {
    pub value: char,
    pub size: usize,
}

/// Smallest code point representable at each encoded length; anything below
/// the threshold for its length is an overlong encoding.
const MIN_FOR_LEN: [u32; 5] = [0, 0, 0x80, 0x800, 0x1_0000];

/// Decode exactly one UTF-8 code point from the start of `bytes`.
///
/// `bytes` must begin at a code point boundary. On failure the caller must
/// abort the current measurement; there is no way to resynchronize.
pub(crate) fn decode(bytes: &[u8]) -> Result<CodePoint, DecodeError> {
    let b0 = *bytes.first().ok_or(DecodeError::Truncated)?;

    let (size, mut acc) = match b0 {
        0x00..=0x7f => {
            return Ok(CodePoint {
                value: b0 as char,
                size: 1,
            });
        }
        0xc0..=0xdf => (2, u32::from(b0 & 0x1f)),
        0xe0..=0xef => (3, u32::from(b0 & 0x0f)),
        0xf0..=0xf7 => (4, u32::from(b0 & 0x07)),
        _ => return Err(DecodeError::InvalidLeadingByte(b0)),
    };

    if bytes.len() < size {
        return Err(DecodeError::Truncated);
    }
    for &b in &bytes[1..size] {
        if b & 0xc0 != 0x80 {
            return Err(DecodeError::InvalidContinuation(b));
        }
        acc = (acc << 6) | u32::from(b & 0x3f);
    }

    if acc < MIN_FOR_LEN[size] {
        return Err(DecodeError::Overlong(acc));
    }
    let value = char::from_u32(acc).ok_or(DecodeError::OutOfRange(acc))?;
    Ok(CodePoint { value, size })
}

/// ASCII whitespace as the directive language sees it: HT through CR, plus
/// the space character. Every other byte, and every multi-byte code point,
/// is content.
#[inline]
pub(crate) fn is_blank(byte: u8) -> bool {
    matches!(byte, b'\t'..=b'\r' | b' ')
}

#[cfg(test)]
mod tests {
    use super::{CodePoint, decode, is_blank};
    use crate::error::DecodeError;

    #[test]
    fn ascii_is_one_byte() {
        assert_eq!(
            decode(b"abc"),
            Ok(CodePoint {
                value: 'a',
                size: 1
            })
        );
    }

    #[test]
    fn multi_byte_sizes() {
        assert_eq!(decode("å".as_bytes()).unwrap().size, 2);
        assert_eq!(decode("┻".as_bytes()).unwrap().size, 3);
        assert_eq!(decode("👍".as_bytes()).unwrap().size, 4);
        assert_eq!(decode("👍".as_bytes()).unwrap().value, '👍');
    }

    #[test]
    fn bare_continuation_is_invalid_leading() {
        assert_eq!(decode(&[0x80]), Err(DecodeError::InvalidLeadingByte(0x80)));
        assert_eq!(decode(&[0xff]), Err(DecodeError::InvalidLeadingByte(0xff)));
    }

    #[test]
    fn truncated_sequence() {
        assert_eq!(decode(&[]), Err(DecodeError::Truncated));
        assert_eq!(decode(&[0xe2, 0x94]), Err(DecodeError::Truncated));
    }

    #[test]
    fn bad_continuation_byte() {
        assert_eq!(
            decode(&[0xc3, 0x20]),
            Err(DecodeError::InvalidContinuation(0x20))
        );
    }

    #[test]
    fn overlong_encoding_rejected() {
        // 0xc0 0xaf would decode to '/' in two bytes.
        assert_eq!(decode(&[0xc0, 0xaf]), Err(DecodeError::Overlong(0x2f)));
    }

    #[test]
    fn surrogate_half_rejected() {
        // U+D800 encoded as three bytes.
        assert_eq!(
            decode(&[0xed, 0xa0, 0x80]),
            Err(DecodeError::OutOfRange(0xd800))
        );
    }

    #[test]
    fn blank_predicate_matches_directive_whitespace() {
        for b in [b'\t', b'\n', 0x0b, 0x0c, b'\r', b' '] {
            assert!(is_blank(b));
        }
        for b in [b'a', b'0', 0x00, 0x08, 0x0e, 0x1b, 0x7f, 0x80, 0xc3] {
            assert!(!is_blank(b));
        }
    }
}
