// Run-level error types and constants

use crate::error::ErrorCode;
use std::fmt;
use std::io;
use tracing::error;

/// Run error code constants
///
/// Error code range: 3001-3002
pub struct RunErrorCodes {}

impl RunErrorCodes {
    /// A test's setup hook returned an error
    pub const SETUP_FAILED: i32 = 3001;

    /// Writing to the report stream failed
    pub const REPORT_WRITE_FAILED: i32 = 3002;
}

/// Log a run error with structured context
///
/// Emits the numeric code, the failing component and the message as
/// separate fields so the event can be filtered on.
pub fn log_run_error(err: &RunError, context: &str) {
    error!(
        code = err.code(),
        component = err.component(),
        context,
        "Run error: {}",
        err.message()
    );
}

/// Errors that terminate an entire run
///
/// Assertion failures are not errors: they fail a single test and the run
/// continues. Anything listed here stops the runner before the summary.
#[derive(Debug)]
pub enum RunError {
    /// A setup hook failed. The run stops at that test and its tear-down
    /// is not invoked.
    Setup {
        group: String,
        name: String,
        source: anyhow::Error,
    },

    /// The report stream rejected a write
    Report { source: io::Error },
}

impl RunError {
    pub fn setup(group: &str, name: &str, source: anyhow::Error) -> Self {
        RunError::Setup {
            group: group.to_string(),
            name: name.to_string(),
            source,
        }
    }

    fn component(&self) -> &'static str {
        match self {
            RunError::Setup { .. } => "Fixture",
            RunError::Report { .. } => "Report",
        }
    }
}

impl ErrorCode for RunError {
    fn code(&self) -> i32 {
        match self {
            RunError::Setup { .. } => RunErrorCodes::SETUP_FAILED,
            RunError::Report { .. } => RunErrorCodes::REPORT_WRITE_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            RunError::Setup {
                group,
                name,
                source,
            } => {
                format!("Setup of {}.{} failed: {:#}", group, name, source)
            }
            RunError::Report { source } => {
                format!("Failed to write report: {}", source)
            }
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RunError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Setup { source, .. } => Some(&**source),
            RunError::Report { source } => Some(source),
        }
    }
}

impl From<io::Error> for RunError {
    fn from(err: io::Error) -> Self {
        RunError::Report { source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_run_error_codes() {
        assert_eq!(
            RunError::setup("Db", "Connects", anyhow!("no socket")).code(),
            RunErrorCodes::SETUP_FAILED
        );
        assert_eq!(
            RunError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed")).code(),
            RunErrorCodes::REPORT_WRITE_FAILED
        );
    }

    #[test]
    fn test_setup_message_names_the_test() {
        let err = RunError::setup("Db", "Connects", anyhow!("no socket"));
        assert_eq!(err.message(), "Setup of Db.Connects failed: no socket");
        assert_eq!(
            err.to_string(),
            "RunError (code 3001): Setup of Db.Connects failed: no socket"
        );
    }

    #[test]
    fn test_error_source_is_preserved() {
        use std::error::Error;

        let err = RunError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        let source = err.source().expect("io source");
        assert_eq!(source.to_string(), "closed");
    }
}
