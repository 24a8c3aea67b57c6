//! Sentiment Backend
//!
//! HTTP client for the remote sentiment-classification service, plus the
//! trait seam the analysis pipeline is written against so tests can run
//! without a live backend.

mod client;

pub use client::{BackendClient, BackendConfig, BackendError};

use crate::sentiment::BatchSummary;
use async_trait::async_trait;

/// One prediction for a single text, as returned by the backend.
///
/// The sentiment label is kept raw here; normalization into the internal
/// label set happens in the pipeline.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub sentiment: String,
    pub confidence: f64,
}

/// One entry from the backend's analysis history.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub timestamp: String,
}

/// Operations the analysis pipeline needs from the sentiment service.
#[async_trait]
pub trait SentimentBackend: Send + Sync {
    /// Classify a single text.
    async fn predict(&self, text: &str) -> Result<Prediction, BackendError>;

    /// Upload a raw CSV file for server-side batch classification.
    async fn predict_csv(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<BatchSummary, BackendError>;

    /// Classify a list of reviews in one request; results align by index.
    async fn predict_batch(&self, reviews: &[String]) -> Result<Vec<Prediction>, BackendError>;

    /// Fetch recent analyses, newest first.
    async fn history(&self) -> Result<Vec<HistoryEntry>, BackendError>;

    /// Fetch aggregate dashboard stats; the shape is backend-defined and
    /// passed through opaquely.
    async fn stats(&self) -> Result<serde_json::Value, BackendError>;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> Result<(), BackendError>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scriptable in-memory backend for pipeline and session tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock backend: queued responses per endpoint, plus a call counter so
    /// tests can assert that no network attempt was made.
    #[derive(Default)]
    pub struct MockBackend {
        predict_queue: Mutex<VecDeque<Result<Prediction, BackendError>>>,
        default_prediction: Option<Prediction>,
        csv_response: Mutex<Option<Result<BatchSummary, BackendError>>>,
        batch_response: Mutex<Option<Result<Vec<Prediction>, BackendError>>>,
        history_entries: Mutex<Vec<HistoryEntry>>,
        stats_value: Mutex<Option<serde_json::Value>>,
        pub calls: AtomicUsize,
    }

    impl MockBackend {
        /// A backend where every call fails as unreachable.
        pub fn unavailable() -> Self {
            Self::default()
        }

        /// A backend whose `predict` always succeeds with the given label.
        pub fn always_predicting(sentiment: &str, confidence: f64) -> Self {
            Self {
                default_prediction: Some(Prediction {
                    sentiment: sentiment.to_string(),
                    confidence,
                }),
                ..Self::default()
            }
        }

        pub fn queue_predict(&self, result: Result<Prediction, BackendError>) {
            self.predict_queue.lock().unwrap().push_back(result);
        }

        pub fn set_csv_response(&self, result: Result<BatchSummary, BackendError>) {
            *self.csv_response.lock().unwrap() = Some(result);
        }

        pub fn set_batch_response(&self, result: Result<Vec<Prediction>, BackendError>) {
            *self.batch_response.lock().unwrap() = Some(result);
        }

        pub fn set_history(&self, entries: Vec<HistoryEntry>) {
            *self.history_entries.lock().unwrap() = entries;
        }

        pub fn set_stats(&self, value: serde_json::Value) {
            *self.stats_value.lock().unwrap() = Some(value);
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn tally(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SentimentBackend for MockBackend {
        async fn predict(&self, _text: &str) -> Result<Prediction, BackendError> {
            self.tally();
            if let Some(result) = self.predict_queue.lock().unwrap().pop_front() {
                return result;
            }
            match &self.default_prediction {
                Some(prediction) => Ok(prediction.clone()),
                None => Err(BackendError::Unavailable),
            }
        }

        async fn predict_csv(
            &self,
            _file_name: &str,
            _bytes: Vec<u8>,
        ) -> Result<BatchSummary, BackendError> {
            self.tally();
            self.csv_response
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(BackendError::Unavailable))
        }

        async fn predict_batch(
            &self,
            _reviews: &[String],
        ) -> Result<Vec<Prediction>, BackendError> {
            self.tally();
            self.batch_response
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(BackendError::Unavailable))
        }

        async fn history(&self) -> Result<Vec<HistoryEntry>, BackendError> {
            self.tally();
            Ok(self.history_entries.lock().unwrap().clone())
        }

        async fn stats(&self) -> Result<serde_json::Value, BackendError> {
            self.tally();
            self.stats_value
                .lock()
                .unwrap()
                .clone()
                .ok_or(BackendError::Unavailable)
        }

        async fn health_check(&self) -> Result<(), BackendError> {
            self.tally();
            Ok(())
        }
    }
}
