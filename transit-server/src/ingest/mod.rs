//! Ingestion of stop and bus records into the catalogue.
//!
//! Decoding the request body is left to serde; this module defines the
//! records themselves and the rules for applying them.

mod apply;
mod error;
mod records;

pub use apply::{IngestSummary, apply_base_requests, apply_patch};
pub use error::IngestError;
pub use records::{
    BaseRequest, BusPatch, BusRecord, LoadDocument, MutationDocument, RoutingSettingsRecord,
    StopInsert, StopRecord,
};
