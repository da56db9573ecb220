//! The narrow seam to the build-tool runtime.

use alloc::vec::Vec;

use bstr::BStr;

/// Capabilities the engine consumes from the host make runtime.
///
/// Directive text travels as [`BStr`]: the engine guarantees it is
/// syntactically valid directive language, not that it is UTF-8.
pub trait Host {
    /// Expand make variable syntax (for example `$(DEBUG_MK)`) to its
    /// current value, or `None` if the host cannot.
    fn expand(&mut self, expr: &BStr) -> Option<Vec<u8>>;

    /// Apply directive text to host state. Failures inside the directive
    /// are the host's concern; nothing is reported back.
    fn eval(&mut self, directive: &BStr);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn expand(&mut self, expr: &BStr) -> Option<Vec<u8>> {
        (**self).expand(expr)
    }

    fn eval(&mut self, directive: &BStr) {
        (**self).eval(directive);
    }
}
