//! Translator client
//!
//! Converts free text into a target language through a remote translation
//! API. A missing translation is a normal outcome (`Ok(None)`); only
//! transport-level problems are errors.

mod http;

pub use http::HttpTranslator;

use async_trait::async_trait;

/// Text translation service
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_lang`.
    ///
    /// Returns `Ok(None)` when the service answered but produced no usable
    /// translation, and `Err` when the call itself failed.
    async fn translate(&self, text: &str, target_lang: &str) -> anyhow::Result<Option<String>>;
}
