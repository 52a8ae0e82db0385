use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Flat log file written next to stdout. Appended to, never rotated.
pub const LOG_FILE: &str = "bot.log";

/// Install the global subscriber: one fmt layer teed to stdout and the log file.
/// The level comes from `RUST_LOG` and defaults to `info`.
pub fn init(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;
    let writer = io::stdout.and(Arc::new(file));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
