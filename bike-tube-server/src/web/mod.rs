//! Web layer for the bike + tube planner.
//!
//! Provides JSON endpoints for listing the network and planning journeys.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, ServerRouter};
