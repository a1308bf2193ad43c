//! Tracing subscriber setup for native hosts.
//!
//! Browser hosts install their own console writer from `trellis-web`.

use std::str::FromStr;
use std::sync::Once;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

static TRACING_INSTALLED: Once = Once::new();

/// Installs a global fmt subscriber (idempotent).
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used, falling back
/// to `info` if it does not parse. An already installed global subscriber is
/// left in place.
pub fn init(default_level: &str) {
    TRACING_INSTALLED.call_once(|| {
        let level = LevelFilter::from_str(default_level).unwrap_or(DEFAULT_LOG_LEVEL);
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init();
    });
}
