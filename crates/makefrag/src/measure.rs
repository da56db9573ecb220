//! Text measurement: byte/codepoint lengths and whitespace trimming.
//!
//! Everything here runs in a single forward pass over the input. `trim`
//! in particular never rescans: trailing-whitespace runs are held back and
//! only committed to the running total once more content shows up after
//! them, so the final length already excludes the tail run when the input
//! ends.
//!
//! Decode errors degrade rather than fail: `measure` yields a zero length
//! and `trim` yields an absent span, with the error reported via
//! [`log::error!`]. Callers proceed as if the string were empty.

use crate::scanner::{decode, is_blank};

/// A string length as (bytes, code points).
///
/// Invariant: `bytes >= chars`, with equality iff the measured text is pure
/// ASCII.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Len {
    /// Length in bytes.
    pub bytes: usize,
    /// Length in Unicode code points.
    pub chars: usize,
}

impl Len {
    /// The empty measurement.
    pub const ZERO: Len = Len { bytes: 0, chars: 0 };

    /// Measurement of a literal known to the emitter at compile time.
    pub(crate) fn of_literal(lit: &str) -> Len {
        Len {
            bytes: lit.len(),
            chars: lit.chars().count(),
        }
    }
}

/// A read-only view into existing text plus its measurement.
///
/// A span never outlives the buffer it views and (when produced by [`trim`])
/// never has zero byte length: "nothing left after trimming" is represented
/// as `None`, not as an empty span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    text: &'a [u8],
    len: Len,
}

impl<'a> Span<'a> {
    /// The bytes this span views.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.text
    }

    /// The span's measurement.
    #[must_use]
    pub fn len(&self) -> Len {
        self.len
    }

    /// Whether the span views no bytes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len.bytes == 0
    }

    /// Measure `s` whole, without trimming.
    ///
    /// Used for inputs that are emitted verbatim (message text, colorized
    /// payloads). A decode error degrades to an empty span.
    pub(crate) fn verbatim(s: &'a [u8]) -> Span<'a> {
        let len = measure(s);
        Span {
            text: &s[..len.bytes],
            len,
        }
    }
}

/// Measure a whole string as (bytes, code points).
///
/// A decode error is logged and yields [`Len::ZERO`].
#[must_use]
pub fn measure(s: &[u8]) -> Len {
    let mut len = Len::ZERO;
    while len.bytes < s.len() {
        match decode(&s[len.bytes..]) {
            Ok(cp) => {
                len.bytes += cp.size;
                len.chars += 1;
            }
            Err(err) => {
                log::error!("UTF-8 error: {err}");
                return Len::ZERO;
            }
        }
    }
    len
}

/// Trim leading and trailing ASCII whitespace, preserving interior
/// whitespace exactly.
///
/// Returns `None` when nothing remains after trimming (empty or
/// whitespace-only input) and on a decode error (logged). The returned span
/// starts at the first non-whitespace byte of `s`.
#[must_use]
pub fn trim(s: &[u8]) -> Option<Span<'_>> {
    let mut pos = 0;
    while pos < s.len() && is_blank(s[pos]) {
        pos += 1;
    }
    if pos == s.len() {
        return None;
    }
    let start = pos;

    let mut len = Len::ZERO;
    loop {
        match decode(&s[pos..]) {
            Ok(cp) => {
                len.bytes += cp.size;
                len.chars += 1;
                pos += cp.size;
            }
            Err(err) => {
                log::error!("UTF-8 error: {err}");
                return None;
            }
        }

        // Hold back the whitespace run: it only counts if content follows.
        let run_start = pos;
        while pos < s.len() && is_blank(s[pos]) {
            pos += 1;
        }
        if pos == s.len() {
            break;
        }
        let run = pos - run_start;
        len.bytes += run;
        len.chars += run;
    }

    Some(Span {
        text: &s[start..start + len.bytes],
        len,
    })
}
