// 📝 Logging - tracing subscriber for the binaries
//
// Library code only emits events; installing a subscriber is the caller's job.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Build the filter: RUST_LOG wins, otherwise `fallback` (from settings)
pub fn build_env_filter(fallback: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    if fallback.trim().is_empty() {
        return Err(anyhow!("log filter cannot be empty"));
    }

    EnvFilter::try_new(fallback).with_context(|| format!("invalid log filter: {}", fallback))
}

/// Install a stderr fmt subscriber so stdout stays free for results
pub fn init_tracing(fallback_filter: &str) -> Result<()> {
    let env_filter = build_env_filter(fallback_filter)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(env_filter),
        )
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}
