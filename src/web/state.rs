//! Application state shared across handlers

use super::limiter::ClientRateLimiter;
use crate::config::Settings;
use crate::engines::{costco::Costco, ProductSearch};
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::search::Search;
use crate::translate::{HttpTranslator, Translator};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search executor
    pub search: Arc<Search>,
    /// Request and upstream metrics
    pub metrics: Arc<Metrics>,
    /// Per-client limiter; `None` when disabled
    pub limiter: Option<Arc<ClientRateLimiter>>,
}

impl AppState {
    /// Create application state talking to the configured upstream services
    pub fn new(settings: Settings, client: HttpClient) -> Self {
        let translator = Arc::new(HttpTranslator::new(client.clone(), &settings.translator));
        let engine = Arc::new(Costco::new(client, settings.product_search.clone()));
        Self::with_services(settings, translator, engine)
    }

    /// Create application state around the given translator and engine
    pub fn with_services(
        settings: Settings,
        translator: Arc<dyn Translator>,
        engine: Arc<dyn ProductSearch>,
    ) -> Self {
        let metrics = Arc::new(Metrics::new());
        let search = Search::new(translator, engine, metrics.clone())
            .with_catalog_lang(settings.search.catalog_lang.clone())
            .with_translation_concurrency(settings.search.translation_concurrency);
        let limiter = ClientRateLimiter::from_settings(&settings).map(Arc::new);

        Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
            metrics,
            limiter,
        }
    }
}
