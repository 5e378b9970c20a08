//! Error types for the NetStack core.

/// Core error type for NetStack infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum NetStackError {
    /// Invalid deployment identifier format.
    #[error("invalid deployment id: {0} (must be non-empty lowercase alphanumeric with hyphens)")]
    InvalidDeploymentId(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for NetStack operations.
pub type NetStackResult<T> = Result<T, NetStackError>;
