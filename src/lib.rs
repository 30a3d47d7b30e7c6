// tinytest - minimal unit test harness
// Self-registering test cases, grouped deterministic execution, soft and hard
// assertions, and a plain-text report with an exit status.

// Module declarations
pub mod assertion;
pub mod case;
pub mod config;
mod declare;
pub mod error;
pub mod harness;
pub mod logging;
pub mod registry;
pub mod report;
pub mod runner;

// Re-exports for convenience
pub use assertion::{Abort, Context, Outcome};
pub use case::{Fixture, FixtureCase, FnCase, TestCase};
pub use harness::harness_main;
pub use registry::{register, Registration, Registry};
pub use runner::{run_all, RunSummary, Runner, Verdict};

#[doc(hidden)]
pub use inventory;
