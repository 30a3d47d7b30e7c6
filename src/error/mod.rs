// Error types for the test harness
//
// Test-level failures never show up here: they travel through the report
// stream and the exit code. These types cover the conditions that stop a
// whole run.

mod run;

pub use run::{log_run_error, RunError, RunErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so logs and exit paths can report them
/// uniformly.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
