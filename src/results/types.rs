//! Result type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product as returned by the catalog search API.
///
/// Only the name and price are read; every other document field is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub price: Option<f64>,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Build a record from one raw search document.
    ///
    /// Returns `None` when the document has no usable name (missing,
    /// not a string, or blank). Prices may be JSON numbers or numeric strings.
    pub fn from_document(doc: &Value, name_field: &str, price_field: &str) -> Option<Self> {
        let name = doc
            .get(name_field)
            .and_then(|n| n.as_str())
            .filter(|n| !n.trim().is_empty())?;

        let price = doc.get(price_field).and_then(|p| match p {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        });

        Some(Self::new(name, price))
    }
}

/// A product name paired with its translation, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedResult {
    pub original_name: String,
    pub translated_name: String,
    pub price: Option<f64>,
}

impl LocalizedResult {
    /// Pair a record with its translated name, keeping the original on failure
    pub fn new(record: ProductRecord, translated: Option<String>) -> Self {
        let translated_name = translated.unwrap_or_else(|| record.name.clone());
        Self {
            original_name: record.name,
            translated_name,
            price: record.price,
        }
    }
}
