//! Declarative test macros driving end-to-end input/output fixtures
//! (spec §8): `test!` asserts the rendered CSS, `error!` asserts a
//! compile failure's message.

#[allow(unused_macros)]
macro_rules! test {
    ($(#[$attr:meta])* $name:ident, $input:expr, $output:expr) => {
        $(#[$attr])*
        #[test]
        fn $name() {
            let options = sasswright::Options::default();
            match sasswright::StyleSheet::new($input, &options) {
                Ok(css) => assert_eq!(css, $output),
                Err(e) => panic!("expected Ok({:?}), got Err({})", $output, e),
            }
        }
    };
}

#[allow(unused_macros)]
macro_rules! error {
    ($(#[$attr:meta])* $name:ident, $input:expr, $output:expr) => {
        $(#[$attr])*
        #[test]
        fn $name() {
            let options = sasswright::Options::default();
            match sasswright::StyleSheet::new($input, &options) {
                Ok(css) => panic!("expected Err({:?}), got Ok({:?})", $output, css),
                Err(e) => assert_eq!(format!("Error: {e}"), $output),
            }
        }
    };
}
