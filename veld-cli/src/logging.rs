//! CLI logging setup
//!
//! Per-phase log targets over `tracing-subscriber`, so one phase can be
//! turned up without drowning in the others
//! (e.g. `--log-level debug` plus RUST_LOG-style narrowing in the filter).

use std::io;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};
use veld_config::Phase;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Colored, multi-line (development)
    Pretty,
    /// Single line, no timestamps
    Compact,
    /// JSON (tool integration)
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

/// Parse a log level name
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "off" | "silent" => Some(LevelFilter::OFF),
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}

/// Initialize the global subscriber with one filter target per build phase.
pub fn init(level: LevelFilter, format: LogFormat) {
    let phases = [Phase::Load, Phase::Parse, Phase::Plan, Phase::Make, Phase::Emit];
    let mut targets = Targets::new().with_default(LevelFilter::WARN);
    for phase in phases {
        targets = targets.with_target(phase.target(), level);
    }

    let layer = match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .without_time()
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(targets))
        .init();
}
