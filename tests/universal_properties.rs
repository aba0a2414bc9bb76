#![cfg(test)]

//! Universal properties (spec §8): expressed as compiled fixtures where the
//! property itself is observable through the `==` operator or `@extend`,
//! rather than as direct calls into the (crate-private) selector/unit APIs.

#[macro_use]
mod macros;

#[test]
fn compile_is_deterministic() {
    let options = sasswright::Options::default();
    let input = "@each $k, $v in (a: 1, b: 2) { .#{$k} { x: $v * 2; } }\na { @media screen { color: mix(red, blue, 50%); } }\n";
    let first = sasswright::StyleSheet::new(input, &options).unwrap();
    let second = sasswright::StyleSheet::new(input, &options).unwrap();
    assert_eq!(first, second);
}

test!(
    resolve_parent_identity_for_non_nested_selector,
    ".a { color: red; }",
    ".a {\n  color: red;\n}\n"
);

test!(
    extend_is_reflexive_and_idempotent,
    ".a { @extend .a; @extend .a; color: red; }",
    ".a {\n  color: red;\n}\n"
);

test!(
    superselector_ignores_simple_selector_order,
    ".a.b { color: red; } .c { @extend .b.a; }",
    ".a.b, .c {\n  color: red;\n}\n"
);

test!(
    extend_is_additive,
    ".a { color: red; } .b { @extend .a; }",
    ".a, .b {\n  color: red;\n}\n"
);

test!(
    unit_conversion_round_trips,
    "a { width: 0px + 1in; height: 0in + 96px; }",
    "a {\n  width: 96px;\n  height: 1in;\n}\n"
);

test!(
    unquote_of_quote_matches_as_string,
    "a { x: unquote(quote(foo)) == foo; }",
    "a {\n  x: true;\n}\n"
);

test!(
    mix_is_commutative_at_50_percent,
    "a { x: mix(red, blue, 50%) == mix(blue, red, 50%); }",
    "a {\n  x: true;\n}\n"
);

test!(
    mix_with_self_is_identity,
    "a { x: mix(red, red, 30%) == red; }",
    "a {\n  x: true;\n}\n"
);

test!(
    map_merge_with_empty_map_is_identity,
    "a { x: map-merge((a: 1, b: 2), ()) == (a: 1, b: 2); }",
    "a {\n  x: true;\n}\n"
);

test!(
    map_keys_preserve_insertion_order,
    "a { x: map-keys((b: 1, a: 2, c: 3)); }",
    "a {\n  x: b, a, c;\n}\n"
);
