//! translate-search: multilingual product search
//!
//! Accepts a query in the user's language, translates it to English,
//! searches a product catalog, and returns the products with their names
//! translated back into the user's language.

pub mod config;
pub mod engines;
pub mod locales;
pub mod metrics;
pub mod network;
pub mod results;
pub mod search;
pub mod translate;
pub mod web;

pub use config::Settings;
pub use engines::ProductSearch;
pub use results::{LocalizedResult, ProductRecord};
pub use search::{Search, SearchError, SearchParams};
pub use translate::Translator;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
