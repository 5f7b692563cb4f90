//! Ingestion error types.

use crate::catalogue::CatalogueError;

/// Errors from applying ingestion records to a catalogue.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    /// A field is missing or has an invalid value
    #[error("malformed input: {0}")]
    Malformed(String),

    /// A record refers to a stop that is neither known nor defined in the batch
    #[error("{referenced_by} refers to unknown stop {stop}")]
    UnknownStop { referenced_by: String, stop: String },

    /// A patch refers to a bus that was never added
    #[error("unknown bus: {0}")]
    UnknownBus(String),

    /// A patch inserts past the end of a route
    #[error("cannot insert into bus {bus} at position {position}: route has {len} stops")]
    PositionOutOfRange {
        bus: String,
        position: usize,
        len: usize,
    },

    /// The catalogue rejected an update
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
}
