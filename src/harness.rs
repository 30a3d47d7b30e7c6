//! Process entry point used by [`test_main!`](crate::test_main).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::config::{ConfigError, HarnessConfig, DEFAULT_CONFIG_FILE};
use crate::logging::init_logging;
use crate::runner::{run_all_with, RUN_ERROR_EXIT_CODE};

#[derive(Parser, Debug)]
#[command(name = "tinytest", about = "Run every registered test")]
pub struct HarnessArgs {
    /// Harness configuration file (defaults to ./tinytest.json)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Log level for diagnostics on stderr (overrides the config file)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Color the pass/fail markers
    #[arg(long, default_value_t = false)]
    pub color: bool,
}

impl HarnessArgs {
    /// Config file contents with command-line overrides applied.
    ///
    /// When the file cannot be used the defaults are returned together with
    /// the reason, which the caller logs once logging is up.
    pub fn resolve_config(&self) -> (HarnessConfig, Option<ConfigError>) {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let (mut config, problem) = match HarnessConfig::read_from_file(&path) {
            Ok(config) => (config, None),
            Err(err) => (HarnessConfig::default(), Some(err)),
        };
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.color {
            config.report.color = true;
        }
        (config, problem)
    }
}

/// Parse flags, set up logging, run everything, and map the result to an
/// exit code.
pub fn harness_main() -> ExitCode {
    let args = HarnessArgs::parse();
    let (config, problem) = args.resolve_config();
    init_logging(&config.logging.level);
    if let Some(err) = problem {
        err.log_fallback();
    }

    let code = run_all_with(&config);
    ExitCode::from(u8::try_from(code).unwrap_or(RUN_ERROR_EXIT_CODE as u8))
}
