//! Log output for the `classdown` binary.
//!
//! Two environment variables drive it. `CLASSDOWN_LOG` holds an
//! `EnvFilter` directive (`RUST_LOG` is read when it is absent) and
//! `CLASSDOWN_LOG_FORMAT` picks `text`, `tree` or `json`.
//!
//! ```bash
//! CLASSDOWN_LOG=debug CLASSDOWN_LOG_FORMAT=tree classdown all
//! CLASSDOWN_LOG="classdown_desugar::method_table=trace" classdown computed-key
//! ```
//!
//! With neither filter variable set the binary stays silent.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_ENV: &str = "CLASSDOWN_LOG";
const FALLBACK_LOG_ENV: &str = "RUST_LOG";
const LOG_FORMAT_ENV: &str = "CLASSDOWN_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One line per event.
    Text,
    /// Spans as an indented tree (`tracing-tree`).
    Tree,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Unknown values fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Resolved logging settings. `directives` is `None` when logging is off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directives: Option<String>,
    pub format: LogFormat,
}

impl LogSettings {
    /// Resolve settings from raw variable values, `CLASSDOWN_LOG` first.
    pub fn resolve(log: Option<String>, fallback: Option<String>, format: Option<String>) -> Self {
        Self {
            directives: log.or(fallback),
            format: format.as_deref().map_or(LogFormat::Text, LogFormat::parse),
        }
    }

    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self::resolve(var(LOG_ENV), var(FALLBACK_LOG_ENV), var(LOG_FORMAT_ENV))
    }
}

/// Install the global subscriber on stderr, keeping stdout for scenario
/// output. A subscriber that is already installed is left in place.
pub fn init_tracing() {
    let settings = LogSettings::from_env();
    let Some(directives) = settings.directives else {
        return;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    let installed = match settings.format {
        LogFormat::Tree => Registry::default()
            .with(filter)
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_targets(true),
            )
            .try_init(),
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
