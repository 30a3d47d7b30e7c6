//! Declaration macros.
//!
//! Each declaration expands to a body function, a constructor, and an
//! `inventory` submission. Nothing runs at load time beyond the submission;
//! the case is built when the global registry is first touched.

/// Declare a test in `$group`.
///
/// ```ignore
/// tinytest::unit_test!(Math, AddsIntegers, |cx| {
///     tinytest::expect_eq!(cx, 2 + 2, 4);
/// });
/// ```
#[macro_export]
macro_rules! unit_test {
    ($group:ident, $name:ident, |$cx:ident| $body:block) => {
        const _: () = {
            #[allow(unreachable_code)]
            fn body($cx: &mut $crate::Context<'_>) -> $crate::Outcome {
                $body
                ::core::result::Result::Ok(())
            }

            fn make() -> ::std::boxed::Box<dyn $crate::TestCase> {
                ::std::boxed::Box::new($crate::FnCase::new(body))
            }

            $crate::inventory::submit! {
                $crate::Registration::new(
                    ::core::stringify!($group),
                    ::core::stringify!($name),
                    ::core::file!(),
                    ::core::line!(),
                    make,
                )
            }
        };
    };
}

/// Declare a test that runs against its own `$fixture` value.
///
/// The group name is the fixture type name. `$fixture` must implement
/// [`Fixture`](crate::Fixture). The value is built once with
/// `Default::default()` and kept for the life of the process, so state left
/// behind by `tear_down` is seen by the next run of the same test.
#[macro_export]
macro_rules! fixture_test {
    ($fixture:ident, $name:ident, |$fx:ident, $cx:ident| $body:block) => {
        const _: () = {
            #[allow(unreachable_code, unused_variables)]
            fn body($fx: &mut $fixture, $cx: &mut $crate::Context<'_>) -> $crate::Outcome {
                $body
                ::core::result::Result::Ok(())
            }

            fn make() -> ::std::boxed::Box<dyn $crate::TestCase> {
                ::std::boxed::Box::new($crate::FixtureCase::<$fixture>::new(body))
            }

            $crate::inventory::submit! {
                $crate::Registration::new(
                    ::core::stringify!($fixture),
                    ::core::stringify!($name),
                    ::core::file!(),
                    ::core::line!(),
                    make,
                )
            }
        };
    };
}

/// Generate a `main` that runs every registered test and exits with the
/// run's status.
#[macro_export]
macro_rules! test_main {
    () => {
        fn main() -> ::std::process::ExitCode {
            $crate::harness_main()
        }
    };
}
