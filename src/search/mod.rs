//! Search orchestration module
//!
//! Validates requests, translates the query, searches the catalog, and
//! translates the result names back into the user's language.

mod error;
mod executor;
mod localizer;
mod models;

pub use error::SearchError;
pub use executor::Search;
pub use localizer::{Localizer, DEFAULT_CONCURRENCY};
pub use models::*;
