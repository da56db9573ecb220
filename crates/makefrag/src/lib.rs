//! A measure-then-emit synthesizer for GNU make directive fragments.
//!
//! The crate generates small, syntactically valid pieces of make directive
//! language — deferred variable definitions, colorized log lines, and full
//! shared-library build-rule blocks — and hands them to an external
//! evaluator behind the [`Host`] seam. Every fragment is assembled with a
//! two-pass protocol: one pass over the fragment's shape measures the exact
//! byte length, the buffer is sized once (inline storage for small
//! fragments, a single exact heap allocation otherwise), and a second pass
//! over the same shape emits the bytes. Nothing is rescanned and nothing
//! regrows.
//!
//! Inputs arrive as raw bytes from the host; the measurement layer decodes
//! them as UTF-8, counting (bytes, code points) and trimming ASCII
//! whitespace from the ends while preserving it in the interior. Malformed
//! input degrades to "nothing to emit" with a diagnostic on the [`log`]
//! facade rather than failing the call.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod config;
mod error;
mod host;
mod measure;
mod scanner;
mod synth;
mod template;


pub use buffer::HostBuf;
pub use config::Config;
pub use error::{DecodeError, OutOfMemory};
pub use host::Host;
pub use measure::{Len, Span, measure, trim};
pub use synth::Engine;
