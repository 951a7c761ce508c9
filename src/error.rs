// Error type shared by the library modules. The UI and `main` wrap these in
// `anyhow` the same way the rest of the binary does.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("no config directory available on this platform")]
    NoConfigDir,
}

impl FetchError {
    /// Helper for `map_err` on filesystem calls.
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> FetchError {
        let path = path.into();
        move |source| FetchError::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
