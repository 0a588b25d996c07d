//! Result types
//!
//! Raw product records from the catalog and the localized records returned
//! to clients.

mod types;

pub use types::*;
