use std::path::PathBuf;

/// Core error type for the bot and the key generator.
///
/// Adapter crates map their specific errors into this type so handlers can
/// report failures consistently through the fault reporter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("catalog error: {path}: {reason}")]
    Catalog { path: PathBuf, reason: String },

    #[error("key generation error: {0}")]
    Generation(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
