//! Fragment generators: the directive-language emitters built on the
//! measure-then-emit protocol.
//!
//! Every generator follows the same shape: trim (or measure verbatim) its
//! inputs, describe the fragment once as a parts slice, size a buffer from
//! the size pass, emit, and either evaluate the text against the host or
//! hand the buffer back to the caller. An input that trims to nothing makes
//! the whole call a no-op; that is an expected outcome, not an error.

use bstr::{BStr, ByteSlice};

use crate::{
    buffer::{HostBuf, TextBuf},
    config::Config,
    error::OutOfMemory,
    host::Host,
    measure::{Span, trim},
    template::{self, Part},
};

/// Message prefixes bound by [`Engine::bootstrap`], with their SGR colors.
/// The padding inside the labels is deliberate: it is colorized verbatim so
/// that log columns line up.
const DEFAULT_PREFIXES: [(&str, &str); 8] = [
    ("CC      ", "0;36"),
    ("CLEAN   ", "0;35"),
    ("CXX     ", "0;36"),
    ("INFO", "38;5;213"),
    ("INSTALL ", "1;36"),
    ("LINK    ", "1;34"),
    ("STRIP   ", "0;33"),
    ("SYMLINK ", "0;32"),
];

/// Which argument of a conditional concatenation is the guard.
#[derive(Debug, Clone, Copy)]
enum Guard {
    Left,
    Right,
}

/// The SGR fragment shape, shared by both colorize strategies so their
/// output cannot differ.
fn sgr_parts<'a>(color: Span<'a>, text: Span<'a>) -> [Part<'a>; 5] {
    [
        Part::Lit("\x1b["),
        Part::Var(color),
        Part::Lit("m"),
        Part::Var(text),
        Part::Lit("\x1b[m"),
    ]
}

/// Colorize into a stack-tier buffer, for composition inside a larger
/// fragment. `None` when `color` trims to nothing.
fn colorize_local<const N: usize>(
    color: &[u8],
    text: &[u8],
) -> Result<Option<TextBuf<N>>, OutOfMemory> {
    let Some(clr) = trim(color) else {
        return Ok(None);
    };
    let txt = Span::verbatim(text);
    template::emit_local(&sgr_parts(clr, txt)).map(Some)
}

/// The text synthesis engine.
///
/// Owns the host seam and the configuration resolved at construction. All
/// operations are synchronous and run to completion; buffers are scoped to
/// one call and released on every exit path.
#[derive(Debug)]
pub struct Engine<H: Host> {
    host: H,
    config: Config,
}

impl<H: Host> Engine<H> {
    /// Create an engine, resolving [`Config`] from the host once.
    pub fn new(mut host: H) -> Self {
        let config = Config::from_host(&mut host);
        Engine { host, config }
    }

    /// Create an engine with an explicit configuration.
    pub fn with_config(host: H, config: Config) -> Self {
        Engine { host, config }
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Shared access to the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Give the host back.
    pub fn into_host(self) -> H {
        self.host
    }

    fn eval(&mut self, directive: &[u8]) {
        if self.config.debug {
            log::debug!("eval: {}", directive.as_bstr());
        }
        self.host.eval(BStr::new(directive));
    }

    /// Define `name` as a lazily frozen constant: the first expansion
    /// re-evaluates `name` to the literal trimmed `value`, and every later
    /// expansion returns that frozen value.
    ///
    /// Evaluates the directive immediately. No-op when either input trims
    /// to nothing.
    ///
    /// # Errors
    ///
    /// [`OutOfMemory`] if sizing the fragment buffer fails; host state is
    /// untouched in that case.
    pub fn lazy(&mut self, name: &[u8], value: &[u8]) -> Result<(), OutOfMemory> {
        let Some(var) = trim(name) else {
            return Ok(());
        };
        let Some(val) = trim(value) else {
            return Ok(());
        };

        let parts = [
            Part::Lit("override "),
            Part::Var(var),
            Part::Lit("=$(eval override "),
            Part::Var(var),
            Part::Lit(":="),
            Part::Var(val),
            Part::Lit(")$("),
            Part::Var(var),
            Part::Lit(")"),
        ];
        let buf = template::emit_local::<256>(&parts)?;
        self.eval(buf.as_bytes());
        Ok(())
    }

    /// Wrap `text` in an SGR color sequence: `ESC [ color m text ESC [ m`,
    /// NUL-terminated.
    ///
    /// `color` is trimmed (`None` when nothing remains); `text` is measured
    /// but used verbatim, whitespace included. The returned buffer is owned
    /// by the caller.
    ///
    /// # Errors
    ///
    /// [`OutOfMemory`] if the allocation fails.
    pub fn colorize(&mut self, color: &[u8], text: &[u8]) -> Result<Option<HostBuf>, OutOfMemory> {
        let Some(clr) = trim(color) else {
            return Ok(None);
        };
        let txt = Span::verbatim(text);
        template::emit_host(&sgr_parts(clr, txt)).map(Some)
    }

    /// Print `text` behind the colorized label registered for `prefix`:
    /// evaluates `$(info $(PREFIX_pfx)TEXT)`.
    ///
    /// `prefix` is trimmed (no-op when nothing remains); `text` is used
    /// verbatim.
    ///
    /// # Errors
    ///
    /// [`OutOfMemory`] if sizing the fragment buffer fails.
    pub fn msg(&mut self, prefix: &[u8], text: &[u8]) -> Result<(), OutOfMemory> {
        let Some(pfx) = trim(prefix) else {
            return Ok(());
        };
        let txt = Span::verbatim(text);

        let parts = [
            Part::Lit("$(info $("),
            Part::Var(pfx),
            Part::Lit("_pfx)"),
            Part::Var(txt),
            Part::Lit(")"),
        ];
        let buf = template::emit_local::<64>(&parts)?;
        self.eval(buf.as_bytes());
        Ok(())
    }

    /// Bind the memoized colorized label for `prefix`: colorizes the label
    /// itself (verbatim, padding included) in `color`, then defines
    /// `PREFIX_pfx` through [`Engine::lazy`] so later [`Engine::msg`] calls
    /// can reference it cheaply.
    ///
    /// Silent no-op when the trim or colorize step finds nothing, or when
    /// the trimmed prefix would overflow the fixed name buffer once the
    /// `_pfx` suffix and terminator are added.
    ///
    /// # Errors
    ///
    /// [`OutOfMemory`] if sizing a fragment buffer fails.
    pub fn register_msg(&mut self, prefix: &[u8], color: &[u8]) -> Result<(), OutOfMemory> {
        let Some(label) = colorize_local::<64>(color, prefix)? else {
            return Ok(());
        };

        const NAME_CAP: usize = 256;
        const SUFFIX: &[u8] = b"_pfx";

        let Some(pfx) = trim(prefix) else {
            return Ok(());
        };
        let pfx_bytes = pfx.len().bytes;
        if pfx_bytes > NAME_CAP - SUFFIX.len() - 1 {
            return Ok(());
        }

        let mut name = [0u8; NAME_CAP];
        name[..pfx_bytes].copy_from_slice(pfx.as_bytes());
        name[pfx_bytes..pfx_bytes + SUFFIX.len()].copy_from_slice(SUFFIX);

        self.lazy(&name[..pfx_bytes + SUFFIX.len()], label.as_bytes())
    }

    /// Emit and evaluate the build-rule block for a shared library `name`
    /// built from the whitespace-separated `sources` list.
    ///
    /// The block declares phony aliases for `name`, `clean-NAME` and
    /// `install-NAME`; `SRC_`/`OBJ_`/`DEP_` list variables (one `.o-fpic`
    /// object and one `.d` dependency file per source); link, compile,
    /// clean and install rules, each section guarded by whether the host's
    /// requested goals (defaulting to `all`) ask for it. No-op when either
    /// input trims to nothing.
    ///
    /// # Errors
    ///
    /// [`OutOfMemory`] if sizing the fragment buffer fails; nothing is
    /// evaluated in that case.
    pub fn library(&mut self, name: &[u8], sources: &[u8]) -> Result<(), OutOfMemory> {
        let Some(name) = trim(name) else {
            return Ok(());
        };
        let Some(src) = trim(sources) else {
            return Ok(());
        };

        use Part::Lit as L;
        let n = Part::Var(name);
        let s = Part::Var(src);

        let parts = [
            L(".PHONY: "),
            n,
            L(" clean-"),
            n,
            L(" install-"),
            n,
            L("\nall:| "),
            n,
            L("\nclean:| clean-"),
            n,
            L("\ninstall:| install-"),
            n,
            L("\n\noverride SRC_"),
            n,
            L(":="),
            s,
            L("\noverride OBJ_"),
            n,
            L(":=$(SRC_"),
            n,
            L(":%=%.o-fpic)\noverride DEP_"),
            n,
            L(":=$(SRC_"),
            n,
            L(":%=%.d)\n\nifneq (,$(filter all "),
            n,
            L(",$(or $(MAKECMDGOALS),all)))\n"),
            n,
            L(": $(THIS_DIR)"),
            n,
            L("\nendif\n\nifneq (,$(filter all install "),
            n,
            L(" install-"),
            n,
            L(",$(or $(MAKECMDGOALS),all)))\n$(THIS_DIR)"),
            n,
            L(": $(OBJ_"),
            n,
            L(":%=$(THIS_DIR)%)\n\t$(msg LINK,"),
            n,
            L(")\n\t@+$(CC) $(CFLAGS) $(CFLAGS_"),
            n,
            L(
                ") -fPIC -shared -o $@ -MMD $^\n\n\
                 %.c.o-fpic: %.c\n\
                 \t$(msg CC,$(@F))\n\
                 \t@+$(CC) $(CFLAGS) $(CFLAGS_$(@F)) -fPIC -c -o $@ -MMD $<\n\n\
                 -include $(DEP_",
            ),
            n,
            L(":%=$(THIS_DIR)%)\nendif\n\nifneq (,$(filter clean clean-"),
            n,
            L(",$(MAKECMDGOALS)))\n$(eval clean-"),
            n,
            L(": $$(eval override WHAT_"),
            n,
            L(" := $$$$(sort $$$$(wildcard $$(addprefix $$(THIS_DIR),"),
            n,
            L(" $$(OBJ_"),
            n,
            L(") $$(DEP_"),
            n,
            L("))))))\n$(eval clean-"),
            n,
            L(":;$$(if $$(WHAT_"),
            n,
            L("),$$(msg YEET,    \x1b[38;5;119m(╯°□°)╯︵ ┻━┻\x1b[m $$(WHAT_"),
            n,
            L(":$$(THIS_DIR)%=%))\t@$$(RM) $$(WHAT_"),
            n,
            L("),@:))\nendif\n\nifneq (,$(filter install install-"),
            n,
            L(",$(MAKECMDGOALS)))\n$(eval install-"),
            n,
            L(": override private DST_"),
            n,
            L("=$(eval override private DST_"),
            n,
            L(":=$$(if $$(DESTDIR),$$(DESTDIR:/=)/)$$(if $$(libdir),$$(libdir:/=)/)"),
            n,
            L(".0)$(DST_"),
            n,
            L("))\ninstall-"),
            n,
            L(": $(THIS_DIR)"),
            n,
            L("\n\t$(msg INSTALL,$(DST_"),
            n,
            L("))\n\t@install -DTsm 0644 $(THIS_DIR)"),
            n,
            L(" $(DST_"),
            n,
            L(")\nendif"),
        ];

        let buf = template::emit_local::<1024>(&parts)?;
        self.eval(buf.as_bytes());
        Ok(())
    }

    /// Expand both arguments and return trimmed `prefix` glued in front of
    /// trimmed `expr` — but only when `expr` expands to something; when
    /// only `expr` itself survives, return it alone, and when it is absent
    /// return `None`.
    ///
    /// # Errors
    ///
    /// [`OutOfMemory`] if the result allocation fails.
    pub fn prefix_if(
        &mut self,
        prefix_expr: &[u8],
        expr: &[u8],
    ) -> Result<Option<HostBuf>, OutOfMemory> {
        self.concat_if(prefix_expr, expr, Guard::Right)
    }

    /// Mirror of [`Engine::prefix_if`]: glue trimmed `suffix` behind
    /// trimmed `expr` when `expr` expands to something.
    ///
    /// # Errors
    ///
    /// [`OutOfMemory`] if the result allocation fails.
    pub fn suffix_if(
        &mut self,
        expr: &[u8],
        suffix_expr: &[u8],
    ) -> Result<Option<HostBuf>, OutOfMemory> {
        self.concat_if(expr, suffix_expr, Guard::Left)
    }

    fn concat_if(
        &mut self,
        left_expr: &[u8],
        right_expr: &[u8],
        guard: Guard,
    ) -> Result<Option<HostBuf>, OutOfMemory> {
        let (guard_expr, other_expr) = match guard {
            Guard::Left => (left_expr, right_expr),
            Guard::Right => (right_expr, left_expr),
        };

        let Some(guard_raw) = self.host.expand(BStr::new(guard_expr)) else {
            return Ok(None);
        };
        let Some(guard_span) = trim(&guard_raw) else {
            return Ok(None);
        };

        let other_raw = self.host.expand(BStr::new(other_expr));
        if let Some(other_raw) = &other_raw {
            if let Some(other_span) = trim(other_raw) {
                let (left, right) = match guard {
                    Guard::Left => (guard_span, other_span),
                    Guard::Right => (other_span, guard_span),
                };
                let parts = [Part::Var(left), Part::Var(right)];
                return template::emit_host(&parts).map(Some);
            }
        }

        template::emit_host(&[Part::Var(guard_span)]).map(Some)
    }

    /// Emit the engine's own baseline directives: define `THIS_DIR` as the
    /// directory of the including makefile, declare the no-op
    /// `all`/`clean`/`install` umbrella targets, and bind the default
    /// message prefixes.
    ///
    /// # Errors
    ///
    /// [`OutOfMemory`] if any fragment buffer cannot be sized; directives
    /// emitted before the failure remain evaluated.
    pub fn bootstrap(&mut self) -> Result<(), OutOfMemory> {
        self.lazy(
            b"THIS_DIR",
            b"$(dir $(realpath $(lastword $(MAKEFILE_LIST))))",
        )?;

        self.eval(
            b".PHONY: all clean install\n\
              all:; @:\n\
              clean:; @:\n\
              install:; @:\n",
        );

        for (prefix, color) in DEFAULT_PREFIXES {
            self.register_msg(prefix.as_bytes(), color.as_bytes())?;
        }
        Ok(())
    }
}
