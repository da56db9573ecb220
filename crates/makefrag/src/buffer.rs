//! Append-only fragment buffers with a small inline tier and a one-time
//! promotion to an exact-size heap block.
//!
//! A fragment buffer starts life as fixed storage embedded in the value
//! itself ([`InlineBuf`]). When the measured size of a fragment exceeds the
//! inline tier, the buffer is promoted — once, at sizing time — to an
//! [`OwnedBuf`] holding a heap block of exactly the required size. Only
//! `InlineBuf` exposes the promotion; `OwnedBuf` has no way to grow, so
//! "reserve again after promoting" cannot be written at all.
//!
//! Appending never checks capacity beyond the slice bound: the two-pass
//! template protocol ([`crate::template`]) sizes every buffer before the
//! first append, and it is the only code that constructs one.

use alloc::{boxed::Box, vec::Vec};

use crate::{error::OutOfMemory, measure::Len};

/// An append target tracked as (bytes, code points).
pub(crate) trait Sink {
    /// Copy `bytes` to the current usage offset and advance usage by `len`.
    ///
    /// Callers must have sized the sink for the full fragment already.
    fn append(&mut self, bytes: &[u8], len: Len);

    /// Write a NUL at the usage offset without advancing usage, for
    /// consumers that expect C-style strings.
    fn terminate(&mut self);
}

/// Fixed storage living inside the buffer value. Capacity is the type
/// parameter; the tiers used by the generators are 64, 256 and 1024.
#[derive(Debug)]
pub(crate) struct InlineBuf<const N: usize> {
    data: [u8; N],
    used: Len,
}

impl<const N: usize> InlineBuf<N> {
    pub(crate) fn new() -> Self {
        InlineBuf {
            data: [0; N],
            used: Len::ZERO,
        }
    }

    /// Trade the inline storage for a heap block of exactly `total` bytes,
    /// carrying over the used prefix and NUL-terminating it.
    ///
    /// Consumes the inline buffer: once promoted there is no way back and no
    /// second promotion. Fails with [`OutOfMemory`] if the allocation does,
    /// leaving nothing allocated.
    pub(crate) fn promote(self, total: usize) -> Result<OwnedBuf, OutOfMemory> {
        debug_assert!(total > self.used.bytes);
        let mut data: Vec<u8> = Vec::new();
        data.try_reserve_exact(total).map_err(|_| OutOfMemory)?;
        data.extend_from_slice(&self.data[..self.used.bytes]);
        data.resize(total, 0);
        Ok(OwnedBuf {
            data: data.into_boxed_slice(),
            used: self.used,
        })
    }
}

/// A promoted buffer: one exclusively owned heap block, released when the
/// value drops. Exposes no growth.
#[derive(Debug)]
pub(crate) struct OwnedBuf {
    data: Box<[u8]>,
    used: Len,
}

/// A fragment buffer in either lifecycle stage.
#[derive(Debug)]
pub(crate) enum TextBuf<const N: usize> {
    Inline(InlineBuf<N>),
    Owned(OwnedBuf),
}

impl<const N: usize> TextBuf<N> {
    /// Construct a buffer sized for `total` bytes of content plus
    /// terminator: inline when the tier suffices, promoted exactly once
    /// otherwise.
    pub(crate) fn sized(total: usize) -> Result<Self, OutOfMemory> {
        if total <= N {
            Ok(TextBuf::Inline(InlineBuf::new()))
        } else {
            Ok(TextBuf::Owned(InlineBuf::<N>::new().promote(total)?))
        }
    }

    /// The bytes appended so far, without the terminator.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            TextBuf::Inline(b) => &b.data[..b.used.bytes],
            TextBuf::Owned(b) => &b.data[..b.used.bytes],
        }
    }

    /// Current usage as (bytes, code points).
    pub(crate) fn len(&self) -> Len {
        match self {
            TextBuf::Inline(b) => b.used,
            TextBuf::Owned(b) => b.used,
        }
    }

    /// Total capacity: the inline tier, or the exact promoted size.
    pub(crate) fn capacity(&self) -> usize {
        match self {
            TextBuf::Inline(_) => N,
            TextBuf::Owned(b) => b.data.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_promoted(&self) -> bool {
        matches!(self, TextBuf::Owned(_))
    }

    fn parts_mut(&mut self) -> (&mut [u8], &mut Len) {
        match self {
            TextBuf::Inline(b) => (&mut b.data, &mut b.used),
            TextBuf::Owned(b) => (&mut b.data, &mut b.used),
        }
    }
}

impl<const N: usize> Sink for TextBuf<N> {
    fn append(&mut self, bytes: &[u8], len: Len) {
        let (data, used) = self.parts_mut();
        debug_assert!(used.bytes + len.bytes <= data.len());
        data[used.bytes..used.bytes + len.bytes].copy_from_slice(bytes);
        used.bytes += len.bytes;
        used.chars += len.chars;
    }

    fn terminate(&mut self) {
        let (data, used) = self.parts_mut();
        data[used.bytes] = 0;
    }
}

/// A heap buffer handed back to the caller instead of being evaluated.
///
/// The original plugin returned memory from the host's allocator so the host
/// could free it; here ownership does that job, and the allocation is still
/// fallible and sized up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBuf {
    data: Vec<u8>,
    used: Len,
}

impl HostBuf {
    /// Allocate exactly `total` bytes up front.
    pub(crate) fn with_capacity(total: usize) -> Result<Self, OutOfMemory> {
        let mut data = Vec::new();
        data.try_reserve_exact(total).map_err(|_| OutOfMemory)?;
        Ok(HostBuf {
            data,
            used: Len::ZERO,
        })
    }

    /// The fragment bytes, without the terminator.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.used.bytes]
    }

    /// The fragment bytes including the trailing NUL, for C-style consumers.
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    /// Usage as (bytes, code points), excluding the terminator.
    #[must_use]
    pub fn len(&self) -> Len {
        self.used
    }

    /// Whether nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used.bytes == 0
    }
}

impl Sink for HostBuf {
    fn append(&mut self, bytes: &[u8], len: Len) {
        self.data.extend_from_slice(bytes);
        self.used.bytes += len.bytes;
        self.used.chars += len.chars;
    }

    fn terminate(&mut self) {
        self.data.push(0);
    }
}
