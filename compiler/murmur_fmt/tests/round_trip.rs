//! Round-trip tests: source through the parser and back out of the
//! renderer.

use murmur_ir::MsgArena;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn round_trip(source: &str) -> String {
    let mut arena = MsgArena::new();
    match murmur_parse::parse(&mut arena, source, "test.mur") {
        Ok(Some(head)) => murmur_fmt::code(&arena, head),
        Ok(None) => panic!("no chain parsed from {source:?}"),
        Err(e) => panic!("parse failed for {source:?}: {e}"),
    }
}

#[test]
fn simple_name() {
    assert_eq!(round_trip("foo"), "foo");
}

#[test]
fn chain_of_names() {
    assert_eq!(round_trip("foo bar"), "foo bar");
}

#[test]
fn call_with_number_arguments() {
    assert_eq!(round_trip("foo(123, 321)"), "foo(123, 321)");
}

#[test]
fn anonymous_group() {
    assert_eq!(round_trip("()"), "()");
}

#[test]
fn text_literal() {
    assert_eq!(round_trip(r#""hello there""#), r#""hello there""#);
}

#[test]
fn text_literal_keeps_escapes_raw() {
    assert_eq!(round_trip(r#""a\nb""#), r#""a\nb""#);
}

#[test]
fn regexp_literal() {
    assert_eq!(round_trip("#/a+b/ix"), "#/a+b/ix");
}

#[test]
fn decimal_literal() {
    assert_eq!(round_trip("3.25"), "3.25");
}

#[test]
fn nested_calls() {
    assert_eq!(round_trip("foo(bar(baz), qux)"), "foo(bar(baz), qux)");
}

#[test]
fn shuffled_code_renders_canonical_call_form() {
    let mut arena = MsgArena::new();
    let head = match murmur_parse::from_text(&mut arena, "2 + 3 * 4", "test.mur") {
        Ok(id) => id,
        Err(e) => panic!("from_text failed: {e}"),
    };
    assert_eq!(murmur_fmt::code(&arena, head), "2 +(3 *(4))");
}

#[test]
fn shuffled_assignment_formats_infix() {
    let mut arena = MsgArena::new();
    let head = match murmur_parse::from_text(&mut arena, "x = 3 + 4", "test.mur") {
        Ok(id) => id,
        Err(e) => panic!("from_text failed: {e}"),
    };
    assert_eq!(murmur_fmt::code(&arena, head), "=(x, 3 +(4))");
    assert_eq!(murmur_fmt::formatted_code(&arena, head, 0), "x = 3 +(4)");
}

#[test]
fn interpolation_formats_back_to_literal() {
    let mut arena = MsgArena::new();
    let head = match murmur_parse::parse(&mut arena, r#""a#{foo}b""#, "test.mur") {
        Ok(Some(id)) => id,
        other => panic!("parse failed: {other:?}"),
    };
    assert_eq!(
        murmur_fmt::formatted_code(&arena, head, 0),
        r#""a#{foo}b""#
    );
}

proptest! {
    /// Space-joined name chains survive a parse/render round trip.
    #[test]
    fn ident_chains_round_trip(names in prop::collection::vec("[a-z][a-z0-9]{0,5}", 1..6)) {
        let source = names.join(" ");
        prop_assert_eq!(round_trip(&source), source);
    }

    /// Rendering is a fixed point: parsing rendered code renders the
    /// same text again.
    #[test]
    fn rendering_is_idempotent(names in prop::collection::vec("[a-z]{1,4}", 1..5)) {
        let source = names.join(" ");
        let once = round_trip(&source);
        prop_assert_eq!(round_trip(&once), once);
    }
}
