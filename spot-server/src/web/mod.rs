//! Web layer for the spot route planner.
//!
//! Provides JSON endpoints for browsing spots, planning routes, and
//! managing saved journeys.

mod dto;
mod error;
mod routes;
mod state;

pub use dto::*;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
