//! fillgauge — live fill-level and consumption estimates from noisy readings.
//!
//! Run with:  `RUST_LOG=info fillgauge [path/to/fillgauge.toml] < readings.jsonl`

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging on stderr; stdout carries the rendered frames.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("fillgauge v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(fillgauge_config::default_path);

    fillgauge_session::run(config_path).await.map_err(Into::into)
}
