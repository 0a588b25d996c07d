//! Web server module
//!
//! Provides the HTTP API of translate-search.

mod auth;
mod handlers;
mod limiter;
mod response;
mod routes;
mod state;

pub use auth::constant_time_compare;
pub use limiter::{client_ip, ClientRateLimiter};
pub use response::{ErrorResponse, SearchResponse};
pub use routes::create_router;
pub use state::AppState;
