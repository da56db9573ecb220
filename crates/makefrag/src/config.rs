//! Process-wide configuration, resolved once at engine construction.

use bstr::BStr;

use crate::{host::Host, measure::trim};

/// Engine configuration.
///
/// The original cached `$(DEBUG_MK)` in a function-local static on first
/// use; resolving it once up front and passing it into the generators keeps
/// the flag explicit and the generators free of hidden state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Trace every evaluated directive through [`log::debug!`].
    pub debug: bool,
}

impl Config {
    /// Resolve configuration from the host: debug is on iff `$(DEBUG_MK)`
    /// expands, after trimming, to exactly `1`.
    pub fn from_host<H: Host>(host: &mut H) -> Self {
        let debug = host
            .expand(BStr::new(b"$(DEBUG_MK)"))
            .and_then(|value| trim(&value).map(|span| span.as_bytes() == b"1"))
            .unwrap_or(false);
        Config { debug }
    }
}
