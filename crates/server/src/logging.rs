//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use buildhook_core::{LogFormat, LoggingConfig};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,tower_http=debug";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the formatting layer for `config`.
///
/// Writes to stdout, or appends to `logging.file` without ANSI colors.
pub fn fmt_layer(config: &LoggingConfig) -> Result<BoxedLayer> {
    let layer: BoxedLayer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let layer = fmt::layer().with_ansi(false).with_writer(Arc::new(file));
            match config.format {
                LogFormat::Text => layer.boxed(),
                LogFormat::Json => layer.json().boxed(),
            }
        }
        None => {
            let layer = fmt::layer();
            match config.format {
                LogFormat::Text => layer.boxed(),
                LogFormat::Json => layer.json().boxed(),
            }
        }
    };
    Ok(layer)
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::registry()
        .with(fmt_layer(config)?)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
