//! Error types for binding operations.

use std::fmt;

use schema::SchemaError;

/// Result type for binding operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while binding to or updating through a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The binding outlived the provider it was created from.
    ProviderDropped,

    /// The binding's parameter config is invalid.
    Schema(SchemaError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderDropped => {
                write!(f, "query param binding used after its provider was dropped")
            }
            Self::Schema(e) => write!(f, "schema error: {e}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(e) => Some(e),
            Self::ProviderDropped => None,
        }
    }
}

impl From<SchemaError> for SyncError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}
