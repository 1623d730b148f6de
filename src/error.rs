//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for manifest-browser glue code.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in the binary and configuration loading.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a manifest or artifact cannot be loaded.
///
/// Every variant carries the manifest name so the session can tell the user
/// which file failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("{name}: server returned {status}")]
    Status {
        name: String,
        status: reqwest::StatusCode,
    },
    /// The body parsed as JSON but is not an array.
    #[error("{name} must be an array")]
    NotAnArray { name: String },
    /// The body is not valid JSON.
    #[error("{name}: invalid JSON: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    /// Network failure before a response was received.
    #[error("{name}: request failed: {source}")]
    Transport {
        name: String,
        #[source]
        source: reqwest::Error,
    },
    /// Reading or writing a local file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The manifest name could not be turned into a URL.
    #[error("{name}: invalid URL: {source}")]
    Url {
        name: String,
        #[source]
        source: url::ParseError,
    },
}

/// Error returned when the configuration file is unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("page_size must be greater than zero")]
    ZeroPageSize,
}
