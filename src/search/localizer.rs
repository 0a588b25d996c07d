//! Translation of product names into the user's language

use crate::metrics::Metrics;
use crate::results::{LocalizedResult, ProductRecord};
use crate::translate::Translator;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Default number of name translations in flight per request
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Maps the translator over product names.
///
/// Issues exactly one translation call per record and yields results in the
/// order of the input. A record the translator has no text for keeps its
/// original name; a failed translator call fails the whole batch.
pub struct Localizer {
    translator: Arc<dyn Translator>,
    metrics: Arc<Metrics>,
    concurrency: usize,
}

impl Localizer {
    pub fn new(translator: Arc<dyn Translator>, metrics: Arc<Metrics>) -> Self {
        Self {
            translator,
            metrics,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the number of translations in flight; 1 translates sequentially
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Translate every record name into `lang`
    pub async fn localize(
        &self,
        records: Vec<ProductRecord>,
        lang: &str,
    ) -> Result<Vec<LocalizedResult>> {
        stream::iter(records)
            .map(|record| self.localize_one(record, lang))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    async fn localize_one(&self, record: ProductRecord, lang: &str) -> Result<LocalizedResult> {
        let start = Instant::now();
        let translated = self.translator.translate(&record.name, lang).await;
        self.metrics
            .record_response_time("translator", start.elapsed().as_millis() as u64);

        let translated = usable_translation(translated.with_context(|| {
            format!("Translating result {:?} into {} failed", record.name, lang)
        })?);
        if translated.is_none() {
            warn!("No translation for {:?} into {}, keeping original", record.name, lang);
        }
        self.metrics.record_translation(translated.is_none());

        Ok(LocalizedResult::new(record, translated))
    }
}

/// Treat blank translations the same as missing ones
pub(crate) fn usable_translation(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
