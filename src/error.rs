use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the typing core: pool loading, config and log files.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A pool with no usable (non-blank) sentences
    #[error("sentence pool `{0}` has no sentences")]
    EmptyPool(String),

    #[error("no embedded sentence pool named `{0}`")]
    UnknownPool(String),
}
