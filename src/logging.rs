// Diagnostics logging
//
// stdout carries the report, so log output goes to stderr.

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Parse a level name, falling back to `WARN` for anything unrecognised.
pub fn parse_level(level: &str) -> Level {
    level.trim().parse::<Level>().unwrap_or(Level::WARN)
}

/// Install the global `tracing` subscriber on stderr.
///
/// Safe to call more than once; later calls keep the first subscriber and
/// return `false`. `log` records (used by the config loader) are bridged
/// into it.
pub fn init_logging(level: &str) -> bool {
    install(level, std::io::stderr)
}

fn install<W>(level: &str, writer: W) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_writer(writer)
        .with_target(false)
        .try_init()
        .is_ok()
}
