//! Service error types.

use crate::catalogue::CatalogueError;
use crate::ingest::IngestError;
use crate::routing::RoutingError;

/// Errors surfaced to callers of the transit service.
///
/// All of these are per-request: none of them leave the shared state changed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// A query or mutation arrived before any dataset was loaded
    #[error("no dataset loaded")]
    NotLoaded,

    #[error("stop not found: {0}")]
    StopNotFound(String),

    #[error("bus not found: {0}")]
    BusNotFound(String),

    /// Both stops exist but no sequence of rides connects them
    #[error("no route from {from} to {to}")]
    Unreachable { from: String, to: String },

    /// The request body could not be decoded
    #[error("malformed input: {0}")]
    Malformed(String),

    /// A dataset file could not be read
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The background graph build did not complete
    #[error("graph rebuild failed: {0}")]
    Rebuild(String),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<CatalogueError> for ServiceError {
    fn from(e: CatalogueError) -> Self {
        match e {
            CatalogueError::StopNotFound(name) => ServiceError::StopNotFound(name),
            CatalogueError::BusNotFound(name) => ServiceError::BusNotFound(name),
        }
    }
}

impl ServiceError {
    /// Whether this error means the requested thing does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::StopNotFound(_)
                | ServiceError::BusNotFound(_)
                | ServiceError::Unreachable { .. }
        )
    }
}
