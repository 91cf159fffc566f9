//! Error taxonomy for a synchronisation run.
//!
//! Every variant is fatal: the pipeline stops at the first error and the CLI
//! surfaces the message with a non-zero exit status.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error type returned by [`crate::contract::RemoteStore`] implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum SyncError {
    /// A required setting is missing or empty, or a setting could not be interpreted.
    #[error("configuration error: {variable}: {reason}")]
    Configuration { variable: String, reason: String },

    /// The tabular input could not be read by any parse strategy.
    #[error("failed to load rows from {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    /// The downloaded navigation document is not a JSON object.
    #[error("downloaded document is not usable: {reason}")]
    DataFormat { reason: String },

    /// Authentication, download or upload against the remote store failed.
    #[error("remote {operation} failed: {reason}")]
    RemoteIo { operation: &'static str, reason: String },

    /// The local copy of the updated document could not be written.
    #[error("failed to write {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub(crate) fn missing_variable(variable: &str) -> Self {
        SyncError::Configuration {
            variable: variable.to_string(),
            reason: format!("Missing required environment variable: {variable}"),
        }
    }

    pub(crate) fn remote(operation: &'static str, err: BoxError) -> Self {
        SyncError::RemoteIo {
            operation,
            reason: err.to_string(),
        }
    }
}
