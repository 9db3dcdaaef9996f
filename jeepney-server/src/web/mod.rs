//! Web layer for the jeepney journey planner.
//!
//! Provides JSON endpoints for planning journeys, browsing routes and
//! quoting fares.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
