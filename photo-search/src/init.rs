//! Tracing initialization
//!
//! Logs go to stderr; stdout carries rendered search results.

use clap::ValueEnum;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log line format on stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines without ANSI colors
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Build the event filter for a `-v` count
///
/// Without `-v`, `RUST_LOG` applies, falling back to `photo_search=info`.
/// `-v` logs query URLs and payload sizes; `-vv` adds the HTTP client.
pub fn env_filter(verbosity: u8) -> anyhow::Result<EnvFilter> {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("photo_search=info"))?,
        1 => EnvFilter::try_new("photo_search=debug")?,
        _ => EnvFilter::try_new("photo_search=trace,reqwest=debug")?,
    };
    Ok(filter)
}

/// Initialize tracing for the photo-search binary
pub fn init_tracing(verbosity: u8, format: LogFormat) -> anyhow::Result<()> {
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(env_filter(verbosity)?)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
        }))
        .try_init()?;

    Ok(())
}
