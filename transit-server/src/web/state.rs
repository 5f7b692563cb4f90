//! Application state for the web layer.

use crate::service::TransitService;

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    /// Current dataset and its routing graph
    pub service: TransitService,
}

impl AppState {
    /// Create a new app state.
    pub fn new(service: TransitService) -> Self {
        Self { service }
    }
}
