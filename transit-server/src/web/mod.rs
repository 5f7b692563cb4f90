//! Web layer for the transit server.
//!
//! Provides HTTP endpoints for loading a dataset, changing it, and querying
//! stops, buses and routes.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
