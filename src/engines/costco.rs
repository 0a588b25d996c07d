//! Costco catalog search engine implementation
//!
//! Queries the search API behind www.costco.com. Headers and fixed query
//! parameters come from `ProductSearchSettings`.

use super::traits::ProductSearch;
use crate::config::ProductSearchSettings;
use crate::network::{HttpClient, OutboundRequest, OutboundResponse};
use crate::results::ProductRecord;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Costco catalog search engine
pub struct Costco {
    client: HttpClient,
    settings: ProductSearchSettings,
}

impl Costco {
    pub fn new(client: HttpClient, settings: ProductSearchSettings) -> Self {
        Self { client, settings }
    }

    /// Build the HTTP request for a search
    pub fn request(&self, query: &str) -> OutboundRequest {
        let mut request = OutboundRequest::get(&self.settings.endpoint);

        for (key, value) in &self.settings.headers {
            request = request.header(key, value);
        }
        request = request.header("x-api-key", self.settings.api_key.expose());

        for (key, value) in &self.settings.params {
            request = request.param(key, value);
        }
        request.param("q", query)
    }

    /// Parse the HTTP response into product records
    pub fn response(&self, response: OutboundResponse) -> Result<Option<Vec<ProductRecord>>> {
        let response = response.error_for_status("Product search API")?;

        let json: serde_json::Value = match response.json() {
            Ok(json) => json,
            Err(e) => {
                warn!("Product search returned an unparseable body: {}", e);
                return Ok(None);
            }
        };

        let docs = match json
            .pointer(&self.settings.docs_pointer)
            .and_then(|d| d.as_array())
        {
            Some(docs) => docs,
            None => {
                warn!(
                    "Product search response has no array at {}",
                    self.settings.docs_pointer
                );
                return Ok(None);
            }
        };

        let records: Vec<ProductRecord> = docs
            .iter()
            .filter_map(|doc| {
                ProductRecord::from_document(
                    doc,
                    &self.settings.name_field,
                    &self.settings.price_field,
                )
            })
            .collect();

        if records.len() < docs.len() {
            debug!(
                "Skipped {} product documents without a name",
                docs.len() - records.len()
            );
        }

        Ok(Some(records))
    }
}

#[async_trait]
impl ProductSearch for Costco {
    fn name(&self) -> &str {
        "costco"
    }

    async fn search(&self, query: &str) -> Result<Option<Vec<ProductRecord>>> {
        let response = self.client.execute(self.request(query)).await?;
        self.response(response)
    }
}
