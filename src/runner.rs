//! Test runner.
//!
//! Drives each entry through `setup` → `run` → `tear_down` in registry order
//! and tallies a [`RunSummary`]. A hard assertion's [`Abort`] is consumed here,
//! at the per-test boundary. A `setup` error is not: it ends the run with
//! [`RunError::Setup`], skipping that test's tear-down and every later test.

use std::io::{self, Write};

use tracing::{debug, info};

use crate::assertion::{Abort, Context};
use crate::config::HarnessConfig;
use crate::error::{log_run_error, RunError};
use crate::registry::{self, Entry, Registry};
use crate::report::Report;

/// Exit status of a run with at least one failed test.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Exit status of a run stopped by a [`RunError`].
pub const RUN_ERROR_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    /// A soft assertion failed; the body ran to completion.
    Failed,
    /// A hard assertion stopped the body.
    Aborted,
}

impl Verdict {
    pub fn passed(self) -> bool {
        self == Verdict::Passed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub group: &'static str,
    pub name: &'static str,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub outcomes: Vec<TestOutcome>,
}

impl RunSummary {
    fn record(&mut self, outcome: TestOutcome) {
        self.total += 1;
        if outcome.verdict.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            FAILURE_EXIT_CODE
        }
    }
}

pub struct Runner<W: Write> {
    entries: Vec<Entry>,
    report: Report<W>,
}

impl<W: Write> Runner<W> {
    /// Runner over `entries` exactly as given.
    ///
    /// Group markers are printed whenever the group changes from one entry
    /// to the next, so entries should be contiguous per group, as
    /// [`Registry::entries_in_order`] guarantees.
    pub fn new(entries: Vec<Entry>, report: Report<W>) -> Self {
        Self { entries, report }
    }

    pub fn from_registry(registry: &Registry, report: Report<W>) -> Self {
        Self::new(registry.entries_in_order(), report)
    }

    /// Execute every entry once. Safe to call repeatedly; each call starts
    /// a fresh tally.
    pub fn run(&mut self) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();

        self.report.announce(&self.entries)?;
        self.report.banner(self.entries.len())?;

        let mut current_group: Option<&str> = None;
        for entry in &self.entries {
            if current_group != Some(entry.group) {
                current_group = Some(entry.group);
                self.report.group(entry.group)?;
            }

            self.report.test_started(entry.name)?;
            let verdict = run_entry(entry, self.report.writer())?;
            self.report.verdict(verdict.passed())?;

            info!(group = entry.group, name = entry.name, ?verdict, "Test finished");
            summary.record(TestOutcome {
                group: entry.group,
                name: entry.name,
                verdict,
            });
        }

        self.report.summary(&summary)?;
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "Run complete"
        );
        Ok(summary)
    }

    pub fn into_report(self) -> Report<W> {
        self.report
    }
}

fn run_entry(entry: &Entry, out: &mut dyn Write) -> Result<Verdict, RunError> {
    debug!(group = entry.group, name = entry.name, "Running test");

    entry
        .case
        .setup()
        .map_err(|source| RunError::setup(entry.group, entry.name, source))?;

    let mut cx = Context::new(out);
    let outcome = entry.case.run(&mut cx);
    let flagged = cx.finish();

    entry.case.tear_down();

    let flagged = flagged?;
    let verdict = match outcome {
        Err(Abort) => Verdict::Aborted,
        Ok(()) if flagged => Verdict::Failed,
        Ok(()) => Verdict::Passed,
    };
    Ok(verdict)
}

/// Run the global registry against stdout with an explicit configuration.
pub fn run_all_with(config: &HarnessConfig) -> i32 {
    // Snapshot so no lock is held while bodies run.
    let entries = registry::global().entries_in_order();
    let report = Report::new(io::stdout().lock(), config.report.clone());
    let mut runner = Runner::new(entries, report);

    match runner.run() {
        Ok(summary) => summary.exit_code(),
        Err(err) => {
            log_run_error(&err, "run_all");
            RUN_ERROR_EXIT_CODE
        }
    }
}

/// Run every registered test, reporting to stdout.
///
/// Returns `0` when all tests passed, [`FAILURE_EXIT_CODE`] when any
/// failed, and [`RUN_ERROR_EXIT_CODE`] when the run could not complete.
pub fn run_all() -> i32 {
    run_all_with(&HarnessConfig::load())
}
