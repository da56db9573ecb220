//! The two-pass "measure then emit" protocol.
//!
//! Each fragment kind is described once, as an ordered slice of [`Part`]s.
//! The size pass ([`reserve_len`]) and the emit pass ([`append_all`]) fold
//! over that same slice, so the reservation and the bytes written can never
//! drift apart — a mismatch between the two would be a buffer overflow in
//! the unchecked append path.
//!
//! The original expressed this with one X-macro expanded twice under
//! different `lit`/`var` definitions; a single parts slice consumed by two
//! folds gives the same guarantee without the hand-maintained pairing.

use crate::{
    buffer::{HostBuf, Sink, TextBuf},
    error::OutOfMemory,
    measure::{Len, Span},
};

/// One element of a fragment's shape: a fixed literal or a measured
/// variable span.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Part<'a> {
    Lit(&'static str),
    Var(Span<'a>),
}

impl Part<'_> {
    fn len(&self) -> Len {
        match self {
            Part::Lit(lit) => Len::of_literal(lit),
            Part::Var(span) => span.len(),
        }
    }
}

/// Size pass: the exact capacity to reserve for `parts`, including one byte
/// for the terminator.
pub(crate) fn reserve_len(parts: &[Part<'_>]) -> usize {
    parts.iter().map(|p| p.len().bytes).sum::<usize>() + 1
}

/// Emit pass: append every part left-to-right, then terminate.
pub(crate) fn append_all<S: Sink>(parts: &[Part<'_>], sink: &mut S) {
    for part in parts {
        let len = part.len();
        match part {
            Part::Lit(lit) => sink.append(lit.as_bytes(), len),
            Part::Var(span) => sink.append(span.as_bytes(), len),
        }
    }
    sink.terminate();
}

/// Emit into a stack-tier buffer, promoting at most once if the fragment
/// outgrows the tier.
pub(crate) fn emit_local<const N: usize>(parts: &[Part<'_>]) -> Result<TextBuf<N>, OutOfMemory> {
    let mut buf = TextBuf::sized(reserve_len(parts))?;
    append_all(parts, &mut buf);
    Ok(buf)
}

/// Emit into a heap buffer meant to be handed back to the caller.
///
/// Byte-identical to [`emit_local`] for the same parts.
pub(crate) fn emit_host(parts: &[Part<'_>]) -> Result<HostBuf, OutOfMemory> {
    let mut buf = HostBuf::with_capacity(reserve_len(parts))?;
    append_all(parts, &mut buf);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::{Part, emit_host, emit_local, reserve_len};
    use crate::measure::trim;

    #[test]
    fn size_pass_equals_emit_pass_plus_terminator() {
        let var = trim(b" value ").unwrap();
        let parts = [
            Part::Lit("head:"),
            Part::Var(var),
            Part::Lit(" ┻━┻ "),
            Part::Var(var),
        ];
        let total = reserve_len(&parts);
        let buf = emit_local::<64>(&parts).unwrap();
        assert_eq!(buf.as_bytes(), "head:value ┻━┻ value".as_bytes());
        assert_eq!(buf.len().bytes + 1, total);
    }

    #[test]
    fn local_and_host_sinks_emit_identical_bytes() {
        let var = trim(b"x").unwrap();
        let parts = [Part::Lit("\x1b["), Part::Var(var), Part::Lit("\x1b[m")];
        let local = emit_local::<64>(&parts).unwrap();
        let host = emit_host(&parts).unwrap();
        assert_eq!(local.as_bytes(), host.as_bytes());
        assert_eq!(host.len().bytes + 1, reserve_len(&parts));
    }

    #[test]
    fn promoted_emit_fills_capacity_exactly() {
        let var = trim(b"0123456789").unwrap();
        let parts = [Part::Var(var), Part::Lit("-"), Part::Var(var)];
        let buf = emit_local::<8>(&parts).unwrap();
        assert!(buf.is_promoted());
        assert_eq!(buf.capacity(), buf.len().bytes + 1);
        assert_eq!(buf.as_bytes(), b"0123456789-0123456789");
    }

    #[test]
    fn multi_byte_literal_accounting() {
        let parts = [Part::Lit("┻━┻")];
        assert_eq!(reserve_len(&parts), 10);
        let buf = emit_local::<16>(&parts).unwrap();
        assert_eq!(buf.len().bytes, 9);
        assert_eq!(buf.len().chars, 3);
    }
}
