//! Logging utilities for millwork
//!
//! This module is only available with the `logging` feature.
//!
//! The library itself only emits `tracing` events (`building '...'`,
//! `successfully built '...'`, `rebuilding scripts`, ...). Library users
//! install their own subscriber; build scripts that just want output on the
//! terminal can call one of these initializers instead.

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize logging with a fixed filter directive (e.g. `"info"` or
/// `"millwork=debug"`).
///
/// Installs a global subscriber; only the first call in a process takes
/// effect.
pub fn init_logging(directive: &str) {
    let directive = directive.parse().unwrap_or_else(|_| "info".parse().unwrap());
    INIT.call_once(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(directive)
            .from_env_lossy();

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .init();
    });
}

/// Initialize logging from the `RUST_LOG` environment variable, defaulting
/// to `info` when unset or invalid.
pub fn init_logging_from_env() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::builder()
                .with_default_directive("info".parse().unwrap())
                .from_env_lossy()
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_target(false).without_time())
            .init();
    });
}
