//! Metrics collection module
//!
//! Tracks request outcomes, translation fallbacks, and upstream latency.

use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Number of response times kept per upstream
const RESPONSE_TIME_WINDOW: usize = 100;

/// How a search request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    InvalidInput,
    TranslationFailed,
    SearchFailed,
    Unexpected,
    RateLimited,
    Unauthorized,
}

/// Process-wide metrics collector
#[derive(Default)]
pub struct Metrics {
    requests: AtomicU64,
    successes: AtomicU64,
    invalid_input: AtomicU64,
    translation_failures: AtomicU64,
    search_failures: AtomicU64,
    unexpected_failures: AtomicU64,
    rate_limited: AtomicU64,
    unauthorized: AtomicU64,
    translations: AtomicU64,
    translation_fallbacks: AtomicU64,
    /// Recent response times in ms, by upstream name
    response_times: Mutex<HashMap<String, VecDeque<u64>>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one request to the search endpoint
    pub fn record_outcome(&self, outcome: Outcome) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            Outcome::Success => &self.successes,
            Outcome::InvalidInput => &self.invalid_input,
            Outcome::TranslationFailed => &self.translation_failures,
            Outcome::SearchFailed => &self.search_failures,
            Outcome::Unexpected => &self.unexpected_failures,
            Outcome::RateLimited => &self.rate_limited,
            Outcome::Unauthorized => &self.unauthorized,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one result-name translation
    pub fn record_translation(&self, fell_back: bool) {
        self.translations.fetch_add(1, Ordering::Relaxed);
        if fell_back {
            self.translation_fallbacks.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record upstream response time
    pub fn record_response_time(&self, upstream: &str, time_ms: u64) {
        let mut times = self
            .response_times
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = times.entry(upstream.to_string()).or_default();

        if entry.len() >= RESPONSE_TIME_WINDOW {
            entry.pop_front();
        }
        entry.push_back(time_ms);
    }

    /// Get average response time for an upstream
    pub fn get_avg_response_time(&self, upstream: &str) -> Option<u64> {
        let times = self
            .response_times
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        times.get(upstream).and_then(|t| {
            if t.is_empty() {
                None
            } else {
                Some(t.iter().sum::<u64>() / t.len() as u64)
            }
        })
    }

    /// Get total requests seen by the search endpoint
    pub fn get_total_requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        let upstreams: Vec<String> = {
            let times = self
                .response_times
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            times.keys().cloned().collect()
        };

        let avg_response_ms = upstreams
            .into_iter()
            .filter_map(|name| {
                let avg = self.get_avg_response_time(&name)?;
                Some((name, avg))
            })
            .collect();

        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            invalid_input: self.invalid_input.load(Ordering::Relaxed),
            translation_failures: self.translation_failures.load(Ordering::Relaxed),
            search_failures: self.search_failures.load(Ordering::Relaxed),
            unexpected_failures: self.unexpected_failures.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            unauthorized: self.unauthorized.load(Ordering::Relaxed),
            translations: self.translations.load(Ordering::Relaxed),
            translation_fallbacks: self.translation_fallbacks.load(Ordering::Relaxed),
            avg_response_ms,
        }
    }
}

/// Serializable view of [`Metrics`]
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub successes: u64,
    pub invalid_input: u64,
    pub translation_failures: u64,
    pub search_failures: u64,
    pub unexpected_failures: u64,
    pub rate_limited: u64,
    pub unauthorized: u64,
    pub translations: u64,
    pub translation_fallbacks: u64,
    pub avg_response_ms: HashMap<String, u64>,
}
