//! Catalogue error types.

/// Errors from catalogue lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogueError {
    /// No stop with this name has been added
    #[error("stop not found: {0}")]
    StopNotFound(String),

    /// No bus with this name has been added
    #[error("bus not found: {0}")]
    BusNotFound(String),
}
