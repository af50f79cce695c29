//! Web layer for the itinerary planner.
//!
//! Provides the HTTP endpoints: health, the station directory, and the
//! path query itself.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
