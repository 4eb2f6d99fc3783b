//! Error types for report export, storage and config loading.
//!
//! None of these escape the public `export_*` / `load_config_file`
//! operations: they are rendered into a single diagnostic line and turned
//! into `None` at that boundary.

use std::path::PathBuf;

/// Failures while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Error decoding {format} file {path}: {message}")]
    Decode {
        format: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("{format} file {path} did not load as a dictionary")]
    NotAMapping { format: &'static str, path: PathBuf },

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),

    #[error("{0} support is not available in this build; rebuild with the `toml` feature")]
    FormatUnavailable(&'static str),

    #[error("Error loading configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures talking to the object store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not open storage session: {0}")]
    Session(String),

    #[error("put s3://{bucket}/{key} failed: {message}")]
    Put {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("bucket {0} was requested but no storage session was supplied")]
    MissingSession(String),
}

/// Failures in the serialize-then-sink pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error uploading to S3: {0}")]
    Storage(#[from] StorageError),

    #[error("document layout failed: {0}")]
    Layout(String),

    #[error("encoding failed: {0}")]
    Encode(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Encode(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Encode(err.to_string())
    }
}

impl From<printpdf::Error> for ExportError {
    fn from(err: printpdf::Error) -> Self {
        ExportError::Layout(err.to_string())
    }
}
