#![allow(missing_docs)]

mod common;

use common::MockHost;
use makefrag::Engine;

fn block(name: &[u8], sources: &[u8]) -> String {
    let mut eng = Engine::new(MockHost::default());
    eng.library(name, sources).unwrap();
    let host = eng.into_host();
    assert_eq!(host.evaluated.len(), 1, "exactly one directive per block");
    host.directive(0).to_owned()
}

#[test]
fn declares_phony_aliases() {
    let text = block(b"libx.so", b"a.c b.c");
    assert!(text.starts_with(".PHONY: libx.so clean-libx.so install-libx.so\n"));
    assert!(text.contains("\nall:| libx.so\n"));
    assert!(text.contains("\nclean:| clean-libx.so\n"));
    assert!(text.contains("\ninstall:| install-libx.so\n"));
}

#[test]
fn derives_object_and_dep_lists_from_sources() {
    let text = block(b"libx.so", b"a.c b.c");
    assert!(text.contains("\noverride SRC_libx.so:=a.c b.c\n"));
    assert!(text.contains("\noverride OBJ_libx.so:=$(SRC_libx.so:%=%.o-fpic)\n"));
    assert!(text.contains("\noverride DEP_libx.so:=$(SRC_libx.so:%=%.d)\n"));
}

#[test]
fn goal_filters_default_to_all() {
    let text = block(b"libx.so", b"a.c");
    assert!(text.contains("ifneq (,$(filter all libx.so,$(or $(MAKECMDGOALS),all)))\n"));
    assert!(text.contains(
        "ifneq (,$(filter all install libx.so install-libx.so,$(or $(MAKECMDGOALS),all)))\n"
    ));
    assert!(text.contains("ifneq (,$(filter clean clean-libx.so,$(MAKECMDGOALS)))\n"));
    assert!(text.contains("ifneq (,$(filter install install-libx.so,$(MAKECMDGOALS)))\n"));
}

#[test]
fn links_target_from_objects() {
    let text = block(b"libx.so", b"a.c b.c");
    assert!(text.contains(
        "$(THIS_DIR)libx.so: $(OBJ_libx.so:%=$(THIS_DIR)%)\n\
         \t$(msg LINK,libx.so)\n\
         \t@+$(CC) $(CFLAGS) $(CFLAGS_libx.so) -fPIC -shared -o $@ -MMD $^\n"
    ));
}

#[test]
fn compiles_each_source_with_a_pattern_rule() {
    let text = block(b"libx.so", b"a.c b.c");
    assert!(text.contains(
        "%.c.o-fpic: %.c\n\
         \t$(msg CC,$(@F))\n\
         \t@+$(CC) $(CFLAGS) $(CFLAGS_$(@F)) -fPIC -c -o $@ -MMD $<\n"
    ));
    assert!(text.contains("-include $(DEP_libx.so:%=$(THIS_DIR)%)\n"));
}

#[test]
fn clean_rule_removes_target_objects_and_deps() {
    let text = block(b"libx.so", b"a.c");
    assert!(text.contains(
        "$(eval clean-libx.so: $$(eval override WHAT_libx.so := $$$$(sort $$$$(wildcard \
         $$(addprefix $$(THIS_DIR),libx.so $$(OBJ_libx.so) $$(DEP_libx.so))))))\n"
    ));
    assert!(text.contains("\t@$$(RM) $$(WHAT_libx.so),@:))\n"));
}

#[test]
fn install_rule_computes_destination_from_host_variables() {
    let text = block(b"libx.so", b"a.c");
    assert!(text.contains(
        ":=$$(if $$(DESTDIR),$$(DESTDIR:/=)/)$$(if $$(libdir),$$(libdir:/=)/)libx.so.0)"
    ));
    assert!(text.contains(
        "install-libx.so: $(THIS_DIR)libx.so\n\
         \t$(msg INSTALL,$(DST_libx.so))\n\
         \t@install -DTsm 0644 $(THIS_DIR)libx.so $(DST_libx.so)\n"
    ));
    assert!(text.ends_with("endif"));
}

#[test]
fn block_size_pass_matches_emit_pass() {
    // The 1024-byte tier forces promotion for any realistic block, and the
    // promoted allocation is sized to exactly content + terminator; usage
    // filling it to capacity - 1 means the two passes agreed.
    let text = block(b"libverylongname.so", b"alpha.c beta.c gamma.c delta.c");
    assert!(text.len() > 1024);
}

#[test]
fn trims_name_and_sources() {
    let text = block(b"  libx.so \n", b"\ta.c  b.c ");
    assert!(text.starts_with(".PHONY: libx.so "));
    assert!(text.contains(":=a.c  b.c\n"));
}

#[test]
fn absent_inputs_are_a_noop() {
    let mut eng = Engine::new(MockHost::default());
    eng.library(b"  ", b"a.c").unwrap();
    eng.library(b"libx.so", b" \t ").unwrap();
    eng.library(b"", b"").unwrap();
    assert!(eng.host().evaluated.is_empty());
}
