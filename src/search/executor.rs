//! Search execution and orchestration

use super::error::SearchError;
use super::localizer::{usable_translation, Localizer};
use super::models::{SearchParams, SearchRequest};
use crate::engines::ProductSearch;
use crate::metrics::Metrics;
use crate::results::LocalizedResult;
use crate::translate::Translator;
use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Runs translate → search → translate-back for one request.
///
/// Holds no per-request state; one instance serves every request.
pub struct Search {
    translator: Arc<dyn Translator>,
    engine: Arc<dyn ProductSearch>,
    localizer: Localizer,
    metrics: Arc<Metrics>,
    catalog_lang: String,
}

impl Search {
    /// Create a new search executor
    pub fn new(
        translator: Arc<dyn Translator>,
        engine: Arc<dyn ProductSearch>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            localizer: Localizer::new(translator.clone(), metrics.clone()),
            translator,
            engine,
            metrics,
            catalog_lang: "en".to_string(),
        }
    }

    /// Set the language queries are translated into before searching
    pub fn with_catalog_lang(mut self, lang: impl Into<String>) -> Self {
        self.catalog_lang = lang.into();
        self
    }

    /// Set how many result names are translated concurrently
    pub fn with_translation_concurrency(mut self, concurrency: usize) -> Self {
        self.localizer = self.localizer.with_concurrency(concurrency);
        self
    }

    /// Validate the parameters and run the pipeline.
    ///
    /// Invalid parameters are rejected before any upstream call is made.
    pub async fn execute(&self, params: &SearchParams) -> Result<Vec<LocalizedResult>, SearchError> {
        let request = SearchRequest::try_from(params)?;

        let request_id = Uuid::new_v4();
        let span = info_span!("search", %request_id, lang = %request.lang);

        let result = self.run(&request).instrument(span.clone()).await;
        if let Err(SearchError::Unexpected(ref e)) = result {
            span.in_scope(|| error!("Error in translation and search: {:#}", e));
        }
        result
    }

    async fn run(&self, request: &SearchRequest) -> Result<Vec<LocalizedResult>, SearchError> {
        // Step 1: translate the query into the catalog language
        let start = Instant::now();
        let translated = self
            .translator
            .translate(&request.query, &self.catalog_lang)
            .await;
        self.metrics
            .record_response_time("translator", start.elapsed().as_millis() as u64);
        let translated = translated.context("Query translation request failed")?;

        let translated = usable_translation(translated).ok_or(SearchError::TranslationFailed)?;
        debug!("Query translated to {:?}", translated);

        // Step 2: search the catalog
        let start = Instant::now();
        let records = self.engine.search(&translated).await;
        self.metrics
            .record_response_time(self.engine.name(), start.elapsed().as_millis() as u64);
        let records =
            records.with_context(|| format!("Product search on {} failed", self.engine.name()))?;

        let records = records.ok_or(SearchError::SearchFailed)?;
        info!("{} returned {} products", self.engine.name(), records.len());

        // Step 3: translate result names back
        Ok(self.localizer.localize(records, &request.lang).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ProductRecord;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Clone, Copy)]
    enum Reply {
        Text(&'static str),
        Nothing,
        Fault,
    }

    /// Translator answering from a table keyed by (text, lang)
    #[derive(Default)]
    struct MockTranslator {
        replies: HashMap<(&'static str, &'static str), Reply>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockTranslator {
        fn with(mut self, text: &'static str, lang: &'static str, reply: Reply) -> Self {
            self.replies.insert((text, lang), reply);
            self
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate(&self, text: &str, target_lang: &str) -> anyhow::Result<Option<String>> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), target_lang.to_string()));
            let reply = self
                .replies
                .iter()
                .find(|((t, l), _)| *t == text && *l == target_lang)
                .map(|(_, r)| *r)
                .unwrap_or(Reply::Nothing);
            match reply {
                Reply::Text(t) => Ok(Some(t.to_string())),
                Reply::Nothing => Ok(None),
                Reply::Fault => anyhow::bail!("translator timed out at 10.1.2.3"),
            }
        }
    }

    enum Catalog {
        Records(Vec<ProductRecord>),
        Missing,
        Fault,
    }

    struct MockEngine {
        catalog: Catalog,
        calls: AtomicUsize,
        queries: Mutex<Vec<String>>,
    }

    impl MockEngine {
        fn new(catalog: Catalog) -> Self {
            Self {
                catalog,
                calls: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProductSearch for MockEngine {
        fn name(&self) -> &str {
            "mock"
        }

        async fn search(&self, query: &str) -> anyhow::Result<Option<Vec<ProductRecord>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            match &self.catalog {
                Catalog::Records(records) => Ok(Some(records.clone())),
                Catalog::Missing => Ok(None),
                Catalog::Fault => anyhow::bail!("operation timed out"),
            }
        }
    }

    fn search(translator: &Arc<MockTranslator>, engine: &Arc<MockEngine>) -> Search {
        Search::new(translator.clone(), engine.clone(), Arc::new(Metrics::new()))
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_calls() {
        let translator = Arc::new(MockTranslator::default());
        let engine = Arc::new(MockEngine::new(Catalog::Records(vec![])));
        let search = search(&translator, &engine);

        for params in [
            SearchParams::default(),
            SearchParams::new("", "mn"),
            SearchParams::new("tv", ""),
        ] {
            let err = search.execute(&params).await.unwrap_err();
            assert!(matches!(err, SearchError::InvalidInput(_)));
        }

        assert_eq!(translator.call_count(), 0);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_query_translation_skips_search() {
        let translator = Arc::new(MockTranslator::default());
        let engine = Arc::new(MockEngine::new(Catalog::Records(vec![])));

        let err = search(&translator, &engine)
            .execute(&SearchParams::new("хөргөгч", "mn"))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::TranslationFailed));
        assert_eq!(translator.call_count(), 1);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_query_translation_is_a_failure() {
        let translator =
            Arc::new(MockTranslator::default().with("хөргөгч", "en", Reply::Text("  ")));
        let engine = Arc::new(MockEngine::new(Catalog::Records(vec![])));

        let err = search(&translator, &engine)
            .execute(&SearchParams::new("хөргөгч", "mn"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::TranslationFailed));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_collection_skips_localization() {
        let translator =
            Arc::new(MockTranslator::default().with("хөргөгч", "en", Reply::Text("refrigerator")));
        let engine = Arc::new(MockEngine::new(Catalog::Missing));

        let err = search(&translator, &engine)
            .execute(&SearchParams::new("хөргөгч", "mn"))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::SearchFailed));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert_eq!(translator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_collection_is_success() {
        let translator =
            Arc::new(MockTranslator::default().with("хөргөгч", "en", Reply::Text("refrigerator")));
        let engine = Arc::new(MockEngine::new(Catalog::Records(vec![])));

        let results = search(&translator, &engine)
            .execute(&SearchParams::new("хөргөгч", "mn"))
            .await
            .unwrap();
        assert!(results.is_empty());
        assert_eq!(translator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_end_to_end_refrigerator() {
        let translator = Arc::new(
            MockTranslator::default()
                .with("refrigerator", "en", Reply::Text("refrigerator"))
                .with("Refrigerator", "mn", Reply::Text("Хөргөгч")),
        );
        let engine = Arc::new(MockEngine::new(Catalog::Records(vec![ProductRecord::new(
            "Refrigerator",
            Some(399.99),
        )])));

        let results = search(&translator, &engine)
            .execute(&SearchParams::new("refrigerator", "mn"))
            .await
            .unwrap();

        assert_eq!(
            results,
            vec![LocalizedResult {
                original_name: "Refrigerator".to_string(),
                translated_name: "Хөргөгч".to_string(),
                price: Some(399.99),
            }]
        );
        assert_eq!(engine.queries.lock().unwrap().as_slice(), ["refrigerator"]);
        assert_eq!(
            translator.calls.lock().unwrap().as_slice(),
            [
                ("refrigerator".to_string(), "en".to_string()),
                ("Refrigerator".to_string(), "mn".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_n_records_n_translations_in_order() {
        let translator = Arc::new(
            MockTranslator::default()
                .with("sofa", "en", Reply::Text("sofa"))
                .with("Sofa A", "mn", Reply::Text("Буйдан A"))
                .with("Sofa B", "mn", Reply::Nothing)
                .with("Sofa D", "mn", Reply::Text("Буйдан D")),
        );
        let records: Vec<_> = ["Sofa A", "Sofa B", "Sofa C", "Sofa D"]
            .iter()
            .map(|n| ProductRecord::new(*n, None))
            .collect();
        let engine = Arc::new(MockEngine::new(Catalog::Records(records)));

        let results = search(&translator, &engine)
            .with_translation_concurrency(3)
            .execute(&SearchParams::new("sofa", "mn"))
            .await
            .unwrap();

        assert_eq!(translator.call_count(), 1 + 4);
        let pairs: Vec<_> = results
            .iter()
            .map(|r| (r.original_name.as_str(), r.translated_name.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Sofa A", "Буйдан A"),
                ("Sofa B", "Sofa B"),
                ("Sofa C", "Sofa C"),
                ("Sofa D", "Буйдан D"),
            ]
        );
    }

    #[tokio::test]
    async fn test_faults_become_unexpected() {
        let translator = Arc::new(MockTranslator::default().with("tv", "en", Reply::Fault));
        let engine = Arc::new(MockEngine::new(Catalog::Records(vec![])));
        let err = search(&translator, &engine)
            .execute(&SearchParams::new("tv", "mn"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Unexpected(_)));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);

        let translator = Arc::new(MockTranslator::default().with("tv", "en", Reply::Text("tv")));
        let engine = Arc::new(MockEngine::new(Catalog::Fault));
        let err = search(&translator, &engine)
            .execute(&SearchParams::new("tv", "mn"))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Unexpected(_)));
        assert_eq!(err.public_message(), "An error occurred. Please try again.");
        assert_eq!(translator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_result_translation_fault_becomes_unexpected() {
        let translator = Arc::new(
            MockTranslator::default()
                .with("tv", "en", Reply::Text("tv"))
                .with("TV", "mn", Reply::Fault),
        );
        let engine = Arc::new(MockEngine::new(Catalog::Records(vec![ProductRecord::new(
            "TV",
            Some(1.0),
        )])));

        let err = search(&translator, &engine)
            .execute(&SearchParams::new("tv", "mn"))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::Unexpected(_)));
        assert_eq!(err.public_message(), "An error occurred. Please try again.");
        assert_eq!(translator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_calls_still_record_latency() {
        let translator = Arc::new(MockTranslator::default().with("tv", "en", Reply::Fault));
        let engine = Arc::new(MockEngine::new(Catalog::Records(vec![])));
        let metrics = Arc::new(Metrics::new());

        Search::new(translator.clone(), engine.clone(), metrics.clone())
            .execute(&SearchParams::new("tv", "mn"))
            .await
            .unwrap_err();
        assert!(metrics.get_avg_response_time("translator").is_some());

        let translator = Arc::new(MockTranslator::default().with("tv", "en", Reply::Text("tv")));
        let engine = Arc::new(MockEngine::new(Catalog::Fault));
        Search::new(translator.clone(), engine.clone(), metrics.clone())
            .execute(&SearchParams::new("tv", "mn"))
            .await
            .unwrap_err();
        assert!(metrics.get_avg_response_time("mock").is_some());
    }

    #[tokio::test]
    async fn test_custom_catalog_language() {
        let translator =
            Arc::new(MockTranslator::default().with("tv", "de", Reply::Text("Fernseher")));
        let engine = Arc::new(MockEngine::new(Catalog::Records(vec![])));

        search(&translator, &engine)
            .with_catalog_lang("de")
            .execute(&SearchParams::new("tv", "mn"))
            .await
            .unwrap();
        assert_eq!(engine.queries.lock().unwrap().as_slice(), ["Fernseher"]);
    }
}
