//! Line-oriented report stream.
//!
//! Layout:
//!
//! ```text
//! ------------------------
//! Running 2 tests:
//! ------------------------
//! -- Math
//! AddsIntegers [Passed]
//! SubtractsIntegers
//! Error at tests/math.rs:9
//! ...
//! [Failed]
//! ------------------------
//! A total of 2 tests performed.
//! 1 tests passed.
//! 1 tests failed.
//! ```

use std::io::{self, Write};

use crate::config::ReportConfig;
use crate::registry::Entry;
use crate::runner::RunSummary;

const COLOR_RESET: &str = "\x1b[0m";
const COLOR_GREEN: &str = "\x1b[32m";
const COLOR_RED: &str = "\x1b[31m";

pub struct Report<W: Write> {
    out: W,
    config: ReportConfig,
}

impl<W: Write> Report<W> {
    pub fn new(out: W, config: ReportConfig) -> Self {
        Self { out, config }
    }

    /// Print one `Found <name>.` line per entry when enabled in config.
    pub fn announce(&mut self, entries: &[Entry]) -> io::Result<()> {
        if !self.config.announce_registrations {
            return Ok(());
        }
        for entry in entries {
            writeln!(self.out, "Found {}.", entry.name)?;
        }
        Ok(())
    }

    pub fn banner(&mut self, total: usize) -> io::Result<()> {
        self.separator()?;
        writeln!(self.out, "Running {} tests:", total)?;
        self.separator()
    }

    pub fn group(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "-- {}", name)
    }

    pub fn test_started(&mut self, name: &str) -> io::Result<()> {
        write!(self.out, "{} ", name)
    }

    pub fn verdict(&mut self, passed: bool) -> io::Result<()> {
        let (label, color) = if passed {
            ("[Passed]", COLOR_GREEN)
        } else {
            ("[Failed]", COLOR_RED)
        };
        if self.config.color {
            writeln!(self.out, "{}{}{}", color, label, COLOR_RESET)
        } else {
            writeln!(self.out, "{}", label)
        }
    }

    pub fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        self.separator()?;
        writeln!(self.out, "A total of {} tests performed.", summary.total)?;
        writeln!(self.out, "{} tests passed.", summary.passed)?;
        writeln!(self.out, "{} tests failed.", summary.failed)?;
        self.out.flush()
    }

    /// Writer handed to test bodies for their diagnostics.
    pub fn writer(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn separator(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(self.config.separator_width))
    }
}
