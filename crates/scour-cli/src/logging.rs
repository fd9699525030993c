//! Logging setup through `tracing` and `tracing-subscriber`.
//!
//! `RUST_LOG` overrides the verbosity flags when set. Without it, the
//! selected level applies to the scour crates while external crates stay
//! at warn to reduce noise.

use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global subscriber. Call once at startup.
pub fn init_logging(level: LevelFilter, with_ansi: bool) {
    let filter = build_env_filter(level);
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(with_ansi)
        .with_target(false)
        .without_time();
    tracing_subscriber::registry().with(filter).with(layer).init();
}

fn build_env_filter(level: LevelFilter) -> EnvFilter {
    let level = level.to_string().to_lowercase();
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,scour_cli={level},scour_clean={level},scour_model={level},\
             scour_plan={level},scour_profile={level}",
        ))
    })
}
