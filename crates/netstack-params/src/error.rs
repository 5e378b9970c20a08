//! Parameter store error types.

/// Errors raised by the parameter store.
#[derive(Debug, thiserror::Error)]
pub enum ParameterError {
    /// The path has never been published.
    #[error("parameter not found: {0} (was the producing stack deployed?)")]
    ParameterNotFound(String),

    /// A path string was not of the form `/<deploymentId>/<name>`.
    #[error("invalid parameter path: {0}")]
    InvalidPath(String),

    /// A snapshot file could not be read or written.
    #[error("snapshot I/O error at {path}: {source}")]
    SnapshotIo {
        /// Snapshot file path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file contained malformed JSON.
    #[error("malformed snapshot at {path}: {source}")]
    SnapshotFormat {
        /// Snapshot file path.
        path: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience result type for parameter operations.
pub type ParameterResult<T> = Result<T, ParameterError>;
