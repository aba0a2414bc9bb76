#![cfg(test)]

//! End-to-end compile scenarios (spec §8).

#[macro_use]
mod macros;

test!(
    nested_rule_parent_ref,
    "a { &:hover { color: red; } .x & { color: blue; } }",
    "a:hover {\n  color: red;\n}\n.x a {\n  color: blue;\n}\n"
);

test!(
    mixin_with_content,
    "@mixin m { @content; } a { @include m { color: red; } }",
    "a {\n  color: red;\n}\n"
);

test!(
    extend_chain,
    ".a { color: red; } .b { @extend .a; } .c { @extend .b; }",
    ".a, .b, .c {\n  color: red;\n}\n"
);

test!(
    media_bubbling,
    "a { @media screen { color: red; } }",
    "@media screen {\n  a {\n    color: red;\n  }\n}\n"
);

error!(
    arithmetic_incompatible_units,
    "a { width: 10px + 2em; }",
    "Error: Incompatible units px and em."
);

test!(
    arithmetic_compatible_units,
    "a { width: 10px + 1in; }",
    "a {\n  width: 106px;\n}\n"
);

test!(
    each_over_map,
    "@each $k, $v in (a: 1, b: 2) { .#{$k} { x: $v; } }",
    ".a {\n  x: 1;\n}\n.b {\n  x: 2;\n}\n"
);

test!(
    placeholder_dropped_from_output,
    "%p { color: red; } .q { @extend %p; }",
    ".q {\n  color: red;\n}\n"
);
