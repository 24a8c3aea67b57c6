//! Session State Container
//!
//! Owns everything the dashboard surface reads: the last single result,
//! the last batch summary, a capped rolling history, the last error
//! message, the busy flag, and (optionally) backend-authoritative
//! history and stats refreshed after each analysis.

use crate::backend::{BackendError, SentimentBackend};
use crate::pipeline::{AnalysisError, Analyzer, FileOutcome, TextOutcome};
use crate::sentiment::{BatchSummary, Sentiment, SentimentRecord};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;

/// Session-level settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum history entries kept; oldest evicted past the cap.
    pub history_cap: usize,
    /// Maximum accepted length for a single text, in characters.
    pub max_text_len: usize,
    /// Re-fetch backend history and stats after each successful analysis,
    /// treating the backend as the source of truth.
    pub refresh_after_analyze: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_cap: 20,
            max_text_len: 1000,
            refresh_after_analyze: false,
        }
    }
}

/// Errors surfaced by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("An analysis is already running")]
    Busy,

    #[error("No text provided")]
    EmptyText,

    #[error("Text exceeds the maximum length of {max} characters")]
    TextTooLong { max: usize },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// The session-local state container.
pub struct Session {
    analyzer: Analyzer,
    backend: Arc<dyn SentimentBackend>,
    config: SessionConfig,
    busy: bool,
    result: Option<SentimentRecord>,
    summary: Option<BatchSummary>,
    history: VecDeque<SentimentRecord>,
    stats: Option<serde_json::Value>,
    last_error: Option<String>,
}

impl Session {
    pub fn new(
        backend: Arc<dyn SentimentBackend>,
        analyzer: Analyzer,
        config: SessionConfig,
    ) -> Self {
        Self {
            analyzer,
            backend,
            config,
            busy: false,
            result: None,
            summary: None,
            history: VecDeque::new(),
            stats: None,
            last_error: None,
        }
    }

    /// Analyze one review text and record the result.
    ///
    /// Rejects re-entrant submissions, empty input, and over-long input
    /// before dispatching. The busy flag is cleared on every exit path.
    pub async fn analyze(&mut self, text: &str) -> Result<TextOutcome, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyText);
        }
        if text.chars().count() > self.config.max_text_len {
            return Err(SessionError::TextTooLong {
                max: self.config.max_text_len,
            });
        }

        self.busy = true;
        self.last_error = None;
        let outcome = self.analyzer.analyze_text(text).await;
        self.busy = false;

        match outcome {
            Ok(outcome) => {
                self.result = Some(outcome.record.clone());
                self.push_history(outcome.record.clone());
                self.last_error = outcome.error.clone();
                self.maybe_refresh().await;
                Ok(outcome)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Analyze a CSV file of reviews and record the batch summary.
    pub async fn analyze_file(
        &mut self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<FileOutcome, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }

        self.busy = true;
        self.last_error = None;
        self.summary = None;
        let outcome = self.analyzer.analyze_file(file_name, bytes).await;
        self.busy = false;

        match outcome {
            Ok(outcome) => {
                self.summary = Some(outcome.summary.clone());
                for record in &outcome.records {
                    self.push_history(record.clone());
                }
                self.last_error = outcome.error.clone();
                self.maybe_refresh().await;
                Ok(outcome)
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Re-fetch history and stats from the backend, replacing local state.
    ///
    /// History entries with labels that fail normalization are dropped.
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let entries = self.backend.history().await?;

        let mut history = VecDeque::with_capacity(self.config.history_cap);
        for entry in entries {
            let Some(sentiment) = Sentiment::parse(&entry.sentiment) else {
                tracing::debug!("Dropping history entry with label {:?}", entry.sentiment);
                continue;
            };
            let timestamp = DateTime::parse_from_rfc3339(&entry.timestamp)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now());
            history.push_back(SentimentRecord::with_timestamp(
                sentiment,
                entry.confidence,
                &entry.text,
                timestamp,
            ));
            if history.len() == self.config.history_cap {
                break;
            }
        }
        self.history = history;

        self.stats = Some(self.backend.stats().await?);
        Ok(())
    }

    async fn maybe_refresh(&mut self) {
        if !self.config.refresh_after_analyze {
            return;
        }
        if let Err(e) = self.refresh().await {
            tracing::debug!("Post-analysis refresh failed: {}", e);
        }
    }

    fn push_history(&mut self, record: SentimentRecord) {
        self.history.push_front(record);
        self.history.truncate(self.config.history_cap);
    }

    // State surface

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn result(&self) -> Option<&SentimentRecord> {
        self.result.as_ref()
    }

    pub fn summary(&self) -> Option<&BatchSummary> {
        self.summary.as_ref()
    }

    /// Rolling history, newest first.
    pub fn history(&self) -> impl Iterator<Item = &SentimentRecord> {
        self.history.iter()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn stats(&self) -> Option<&serde_json::Value> {
        self.stats.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // Clear operations, each independent

    pub fn clear_result(&mut self) {
        self.result = None;
    }

    pub fn clear_summary(&mut self) {
        self.summary = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::MockBackend;
    use crate::backend::HistoryEntry;
    use crate::pipeline::AnalysisPolicy;

    fn session_with(backend: MockBackend, config: SessionConfig) -> Session {
        let backend = Arc::new(backend);
        let analyzer = Analyzer::new(backend.clone(), AnalysisPolicy::default());
        Session::new(backend, analyzer, config)
    }

    #[tokio::test]
    async fn test_analyze_stores_result_and_history() {
        let mut session = session_with(
            MockBackend::always_predicting("Positive", 0.92),
            SessionConfig::default(),
        );

        let before = session.history_len();
        let outcome = session.analyze("This is great!").await.unwrap();

        assert!(!outcome.simulated);
        let stored = session.result().unwrap();
        assert_eq!(stored.sentiment, Sentiment::Positive);
        assert_eq!(stored.confidence, 0.92);
        assert_eq!(session.history_len(), before + 1);
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_and_overlong() {
        let mut session = session_with(
            MockBackend::always_predicting("Positive", 0.9),
            SessionConfig {
                max_text_len: 10,
                ..Default::default()
            },
        );

        assert!(matches!(
            session.analyze("   ").await.unwrap_err(),
            SessionError::EmptyText
        ));
        assert!(matches!(
            session.analyze("this is far too long").await.unwrap_err(),
            SessionError::TextTooLong { max: 10 }
        ));
        assert_eq!(session.history_len(), 0);
    }

    #[tokio::test]
    async fn test_history_cap_evicts_oldest_first() {
        let mut session = session_with(
            MockBackend::always_predicting("positive", 0.9),
            SessionConfig {
                history_cap: 5,
                ..Default::default()
            },
        );

        for i in 0..8 {
            session.analyze(&format!("review number {}", i)).await.unwrap();
        }

        assert_eq!(session.history_len(), 5);
        let texts: Vec<&str> = session.history().map(|r| r.text.as_str()).collect();
        // Newest first; the three oldest were evicted
        assert_eq!(texts[0], "review number 7");
        assert_eq!(texts[4], "review number 3");
    }

    #[tokio::test]
    async fn test_analyze_demo_mode_sets_error_but_succeeds() {
        let mut session = session_with(MockBackend::unavailable(), SessionConfig::default());

        let outcome = session.analyze("hello").await.unwrap();
        assert!(outcome.simulated);
        assert!(session.last_error().is_some());
        assert_eq!(session.history_len(), 1);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_analyze_file_stores_summary() {
        let mock = MockBackend::unavailable();
        mock.set_csv_response(Ok(BatchSummary {
            positive: 2,
            negative: 1,
            total: 3,
            ..Default::default()
        }));
        let mut session = session_with(mock, SessionConfig::default());

        session
            .analyze_file("r.csv", b"review\na\nb\nc\n")
            .await
            .unwrap();
        assert_eq!(session.summary().unwrap().total, 3);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_analyze_file_failure_clears_busy_and_sets_error() {
        let mut session = session_with(MockBackend::unavailable(), SessionConfig::default());

        let err = session
            .analyze_file("bad.csv", b"foo,bar\n1,2\n")
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("'review', 'text', or 'content' column"));
        assert!(session.last_error().is_some());
        assert!(!session.is_busy());
        assert!(session.summary().is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_history_from_backend() {
        let mock = MockBackend::unavailable();
        mock.set_history(vec![
            HistoryEntry {
                text: "newest".to_string(),
                sentiment: "Very Positive".to_string(),
                confidence: 0.97,
                timestamp: "2024-03-01T12:00:00+00:00".to_string(),
            },
            HistoryEntry {
                text: "garbled".to_string(),
                sentiment: "???".to_string(),
                confidence: 0.5,
                timestamp: String::new(),
            },
            HistoryEntry {
                text: "older".to_string(),
                sentiment: "negative".to_string(),
                confidence: 0.66,
                timestamp: String::new(),
            },
        ]);
        mock.set_stats(serde_json::json!({"total": 42, "positive": 30}));
        let mut session = session_with(mock, SessionConfig::default());

        session.refresh().await.unwrap();

        // Unknown-label entry dropped
        assert_eq!(session.history_len(), 2);
        let first = session.history().next().unwrap();
        assert_eq!(first.sentiment, Sentiment::VeryPositive);
        assert_eq!(first.confidence, 0.97);
        assert_eq!(session.stats().unwrap()["total"], 42);
    }

    #[tokio::test]
    async fn test_clear_operations_are_independent() {
        let mut session = session_with(
            MockBackend::always_predicting("neutral", 0.8),
            SessionConfig::default(),
        );
        session.analyze("something").await.unwrap();

        session.clear_result();
        assert!(session.result().is_none());
        assert_eq!(session.history_len(), 1);

        session.clear_history();
        assert_eq!(session.history_len(), 0);
    }
}
