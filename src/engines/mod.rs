//! Product search engine module
//!
//! Defines the ProductSearch trait and the catalog backends implementing it.

mod traits;

// Engine implementations
pub mod costco;

pub use traits::*;
