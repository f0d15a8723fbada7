use thiserror::Error;

/// Top-level error type used across the workspace.
///
/// The aggregation engine itself never produces one of these: bad readings
/// are absorbed, not rejected. Errors only come from the glue around it.
#[derive(Debug, Error)]
pub enum GaugeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("feed error: {0}")]
    Feed(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = GaugeError> = std::result::Result<T, E>;
