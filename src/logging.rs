//! Tracing subscriber setup for the CLI host.

use std::time::{Duration, Instant};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initialises tracing with a `BOOKREC_LOG`-controlled filter.
pub fn init() -> anyhow::Result<()> {
    let format_filter = EnvFilter::try_from_env("BOOKREC_LOG")
        .or_else(|_| EnvFilter::try_new("bookrec=info"))?;
    let format_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_filter(format_filter);

    tracing_subscriber::Registry::default()
        .with(format_layer)
        .init();

    Ok(())
}

#[must_use]
pub fn format_duration(duration: Duration) -> String {
    humantime::format_duration(duration).to_string()
}

#[must_use]
pub fn format_elapsed(since: Instant) -> String {
    format_duration(since.elapsed())
}
