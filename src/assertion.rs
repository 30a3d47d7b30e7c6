//! Assertion protocol shared by every test body.
//!
//! Two macro families sit on top of the same checks:
//!
//! - `expect_*!` (soft): on failure a [`Diagnostic`] is written to the report
//!   stream, the [`Context`] failure flag is set, and the body keeps running.
//!   The macro evaluates to `true` when the check held.
//! - `require_*!` (hard): same diagnostic and flag, then the enclosing body
//!   returns `Err(Abort)`. The runner catches that at the per-test boundary.
//!
//! Every operand is evaluated exactly once, pass or fail.

use std::fmt::{self, Debug};
use std::io::{self, Write};

use tracing::debug;

/// Control-flow value returned by a hard assertion to stop the current body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort;

/// Result of a test body: `Err(Abort)` when a hard assertion fired.
pub type Outcome = Result<(), Abort>;

/// Binary comparisons supported by the `*_eq`..`*_le` macros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    /// Wording used in the `Expected X to be <phrase> Y.` line.
    pub fn phrase(self) -> &'static str {
        match self {
            Comparison::Eq => "equal to",
            Comparison::Ne => "different from",
            Comparison::Gt => "greater than",
            Comparison::Ge => "greater or equal to",
            Comparison::Lt => "less than",
            Comparison::Le => "less or equal to",
        }
    }
}

/// One failed check, rendered into the report stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    file: &'static str,
    line: u32,
    expected: String,
    got: Vec<String>,
}

impl Diagnostic {
    pub fn truth(file: &'static str, line: u32, expr: &str, wanted: bool) -> Self {
        Self {
            file,
            line,
            expected: format!("Expected {} to be {}.", expr, wanted),
            got: vec![format!("Got {} = {}", expr, !wanted)],
        }
    }

    pub fn compare(
        file: &'static str,
        line: u32,
        comparison: Comparison,
        left_expr: &str,
        right_expr: &str,
        left: &dyn Debug,
        right: &dyn Debug,
    ) -> Self {
        Self {
            file,
            line,
            expected: format!(
                "Expected {} to be {} {}.",
                left_expr,
                comparison.phrase(),
                right_expr
            ),
            got: vec![
                format!("Got {} = {:?}", left_expr, left),
                format!("Got {} = {:?}", right_expr, right),
            ],
        }
    }

    pub fn succeeded(file: &'static str, line: u32, expr: &str, error: &dyn Debug) -> Self {
        Self {
            file,
            line,
            expected: format!("Expected {} to succeed.", expr),
            got: vec![format!("Got error: {:?}", error)],
        }
    }

    pub fn failed_with(
        file: &'static str,
        line: u32,
        expr: &str,
        pattern: &str,
        actual: &dyn Debug,
    ) -> Self {
        Self {
            file,
            line,
            expected: format!("Expected {} to fail with {}.", expr, pattern),
            got: vec![format!("Got {} = {:?}", expr, actual)],
        }
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Error at {}:{}", self.file, self.line)?;
        writeln!(f, "{}", self.expected)?;
        for line in &self.got {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Per-invocation state handed to a test body.
///
/// Holds the failure flag and the report stream diagnostics are written to.
/// The runner builds a fresh one for every test, so re-running a registry
/// never sees stale flags.
pub struct Context<'a> {
    out: &'a mut dyn Write,
    failures: usize,
    write_error: Option<io::Error>,
}

impl<'a> Context<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self {
            out,
            failures: 0,
            write_error: None,
        }
    }

    /// Record a failed check. Used by the assertion macros.
    pub fn fail(&mut self, diagnostic: Diagnostic) {
        self.failures += 1;
        debug!(
            file = diagnostic.file(),
            line = diagnostic.line(),
            "Assertion failed"
        );
        // Only the first write error is kept; the runner reports it once the
        // body has returned.
        if self.write_error.is_none() {
            if let Err(err) = write!(self.out, "{}", diagnostic) {
                self.write_error = Some(err);
            }
        }
    }

    /// Whether any check in this body has failed so far.
    pub fn failed(&self) -> bool {
        self.failures > 0
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Consume the context, yielding the failure flag or the first write error.
    pub(crate) fn finish(self) -> io::Result<bool> {
        match self.write_error {
            Some(err) => Err(err),
            None => Ok(self.failures > 0),
        }
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_truth {
    ($cx:expr, $value:expr, $wanted:literal) => {{
        let value: bool = $value;
        if value == $wanted {
            true
        } else {
            $cx.fail($crate::assertion::Diagnostic::truth(
                ::core::file!(),
                ::core::line!(),
                ::core::stringify!($value),
                $wanted,
            ));
            false
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_cmp {
    ($cx:expr, $left:expr, $right:expr, $op:tt, $cmp:ident) => {
        match (&$left, &$right) {
            (left, right) => {
                if *left $op *right {
                    true
                } else {
                    $cx.fail($crate::assertion::Diagnostic::compare(
                        ::core::file!(),
                        ::core::line!(),
                        $crate::assertion::Comparison::$cmp,
                        ::core::stringify!($left),
                        ::core::stringify!($right),
                        left,
                        right,
                    ));
                    false
                }
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_ok {
    ($cx:expr, $expr:expr) => {
        match $expr {
            ::core::result::Result::Ok(_) => true,
            ::core::result::Result::Err(err) => {
                $cx.fail($crate::assertion::Diagnostic::succeeded(
                    ::core::file!(),
                    ::core::line!(),
                    ::core::stringify!($expr),
                    &err,
                ));
                false
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __check_err {
    ($cx:expr, $expr:expr, $pat:pat) => {
        match $expr {
            #[allow(unused_variables)]
            ::core::result::Result::Err($pat) => true,
            other => {
                $cx.fail($crate::assertion::Diagnostic::failed_with(
                    ::core::file!(),
                    ::core::line!(),
                    ::core::stringify!($expr),
                    ::core::stringify!($pat),
                    &other,
                ));
                false
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __require {
    ($check:expr) => {
        if !$check {
            return ::core::result::Result::Err($crate::assertion::Abort);
        }
    };
}

/// Soft check that a boolean expression is `true`.
#[macro_export]
macro_rules! expect_true {
    ($cx:expr, $value:expr $(,)?) => {
        $crate::__check_truth!($cx, $value, true)
    };
}

/// Soft check that a boolean expression is `false`.
#[macro_export]
macro_rules! expect_false {
    ($cx:expr, $value:expr $(,)?) => {
        $crate::__check_truth!($cx, $value, false)
    };
}

#[macro_export]
macro_rules! expect_eq {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_cmp!($cx, $left, $right, ==, Eq)
    };
}

#[macro_export]
macro_rules! expect_ne {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_cmp!($cx, $left, $right, !=, Ne)
    };
}

#[macro_export]
macro_rules! expect_gt {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_cmp!($cx, $left, $right, >, Gt)
    };
}

#[macro_export]
macro_rules! expect_ge {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_cmp!($cx, $left, $right, >=, Ge)
    };
}

#[macro_export]
macro_rules! expect_lt {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_cmp!($cx, $left, $right, <, Lt)
    };
}

#[macro_export]
macro_rules! expect_le {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__check_cmp!($cx, $left, $right, <=, Le)
    };
}

/// Soft check that a `Result` expression is `Ok`.
#[macro_export]
macro_rules! expect_ok {
    ($cx:expr, $expr:expr $(,)?) => {
        $crate::__check_ok!($cx, $expr)
    };
}

/// Soft check that a `Result` expression is an `Err` matching `$pat`.
///
/// ```ignore
/// expect_err!(cx, "x".parse::<u8>(), ParseIntError { .. });
/// ```
#[macro_export]
macro_rules! expect_err {
    ($cx:expr, $expr:expr, $pat:pat $(,)?) => {
        $crate::__check_err!($cx, $expr, $pat)
    };
}

/// Hard check that a boolean expression is `true`.
#[macro_export]
macro_rules! require_true {
    ($cx:expr, $value:expr $(,)?) => {
        $crate::__require!($crate::__check_truth!($cx, $value, true))
    };
}

/// Hard check that a boolean expression is `false`.
#[macro_export]
macro_rules! require_false {
    ($cx:expr, $value:expr $(,)?) => {
        $crate::__require!($crate::__check_truth!($cx, $value, false))
    };
}

#[macro_export]
macro_rules! require_eq {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__require!($crate::__check_cmp!($cx, $left, $right, ==, Eq))
    };
}

#[macro_export]
macro_rules! require_ne {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__require!($crate::__check_cmp!($cx, $left, $right, !=, Ne))
    };
}

#[macro_export]
macro_rules! require_gt {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__require!($crate::__check_cmp!($cx, $left, $right, >, Gt))
    };
}

#[macro_export]
macro_rules! require_ge {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__require!($crate::__check_cmp!($cx, $left, $right, >=, Ge))
    };
}

#[macro_export]
macro_rules! require_lt {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__require!($crate::__check_cmp!($cx, $left, $right, <, Lt))
    };
}

#[macro_export]
macro_rules! require_le {
    ($cx:expr, $left:expr, $right:expr $(,)?) => {
        $crate::__require!($crate::__check_cmp!($cx, $left, $right, <=, Le))
    };
}

/// Hard check that a `Result` expression is `Ok`.
#[macro_export]
macro_rules! require_ok {
    ($cx:expr, $expr:expr $(,)?) => {
        $crate::__require!($crate::__check_ok!($cx, $expr))
    };
}

/// Hard check that a `Result` expression is an `Err` matching `$pat`.
#[macro_export]
macro_rules! require_err {
    ($cx:expr, $expr:expr, $pat:pat $(,)?) => {
        $crate::__require!($crate::__check_err!($cx, $expr, $pat))
    };
}
