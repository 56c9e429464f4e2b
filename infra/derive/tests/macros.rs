#[test]
fn macros_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/event_map_pass.rs");
    t.pass("tests/ui/event_map_private.rs");
    t.pass("tests/ui/tidings_error_pass.rs");
    t.compile_fail("tests/ui/event_map_generic.rs");
    t.compile_fail("tests/ui/event_map_named_fields.rs");
    t.compile_fail("tests/ui/event_map_empty_name.rs");
    t.compile_fail("tests/ui/tidings_error_tuple_variant.rs");
    t.compile_fail("tests/ui/tidings_error_no_context.rs");
    t.compile_fail("tests/ui/tidings_error_bad_context_type.rs");
}
