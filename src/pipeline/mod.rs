//! Analysis Pipeline
//!
//! The request dispatcher: single-text prediction with a simulated
//! fallback, and the ordered fallback chain for CSV files
//! (CSV endpoint -> batch endpoint -> per-item -> full simulation).
//!
//! One consolidated pipeline replaces the near-identical per-variant
//! implementations; behavior differences are expressed through
//! [`AnalysisPolicy`] flags.

mod simulate;

pub use simulate::simulated_record;

use crate::backend::{BackendError, SentimentBackend};
use crate::ingest::{self, IngestError};
use crate::sentiment::{BatchSummary, Sentiment, SentimentRecord};
use std::sync::Arc;

/// Policy flags controlling fallback behavior.
#[derive(Debug, Clone)]
pub struct AnalysisPolicy {
    /// Synthesize plausible results instead of failing when the backend
    /// is unreachable (demo mode).
    pub simulate_on_failure: bool,
    /// Whether the backend exposes `/predict/csv`; when false the file
    /// chain starts at the batch endpoint.
    pub use_csv_endpoint: bool,
    /// Cap on sequential per-item requests in the last network fallback,
    /// to bound request fan-out.
    pub per_item_cap: usize,
}

impl Default for AnalysisPolicy {
    fn default() -> Self {
        Self {
            simulate_on_failure: true,
            use_csv_endpoint: true,
            per_item_cap: 10,
        }
    }
}

/// Which stage of the fallback chain produced a file outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSource {
    CsvEndpoint,
    BatchEndpoint,
    PerItem,
    Simulated,
}

/// Result of a single-text analysis.
#[derive(Debug, Clone)]
pub struct TextOutcome {
    pub record: SentimentRecord,
    /// True when the record was synthesized because the backend failed.
    pub simulated: bool,
    /// The failure that triggered simulation, for surfacing to the user.
    pub error: Option<String>,
}

/// Result of a file analysis.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub summary: BatchSummary,
    /// Per-item records, populated only by the per-item stage.
    pub records: Vec<SentimentRecord>,
    pub source: BatchSource,
    /// How many items were individually replaced with simulated values.
    pub simulated_items: usize,
    /// Last transport failure along the chain, when any stage fell back.
    pub error: Option<String>,
}

impl FileOutcome {
    /// Whether the outcome involved any simulated data.
    pub fn is_demo(&self) -> bool {
        self.source == BatchSource::Simulated || self.simulated_items > 0
    }
}

/// Errors that abort an analysis operation outright.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("Sentiment backend failed: {0}")]
    Backend(String),
}

/// The request dispatcher.
///
/// Holds the backend behind the trait seam so tests can drive the chain
/// with a scripted mock.
pub struct Analyzer {
    backend: Arc<dyn SentimentBackend>,
    policy: AnalysisPolicy,
}

impl Analyzer {
    pub fn new(backend: Arc<dyn SentimentBackend>, policy: AnalysisPolicy) -> Self {
        Self { backend, policy }
    }

    /// Analyze a single text.
    ///
    /// Expects input already trimmed and length-checked by the caller.
    /// Transport failures (and unrecognized labels) fall back to a
    /// simulated record when the policy allows, so the caller always has
    /// something to show.
    pub async fn analyze_text(&self, text: &str) -> Result<TextOutcome, AnalysisError> {
        let failure = match self.backend.predict(text).await {
            Ok(prediction) => match Sentiment::parse(&prediction.sentiment) {
                Some(sentiment) => {
                    tracing::debug!(
                        sentiment = %sentiment,
                        confidence = prediction.confidence,
                        "prediction complete"
                    );
                    return Ok(TextOutcome {
                        record: SentimentRecord::new(sentiment, prediction.confidence, text),
                        simulated: false,
                        error: None,
                    });
                }
                None => format!("Unrecognized sentiment label: {}", prediction.sentiment),
            },
            Err(e) => e.to_string(),
        };

        if !self.policy.simulate_on_failure {
            return Err(AnalysisError::Backend(failure));
        }

        tracing::warn!("Prediction failed ({}), showing simulated result", failure);
        Ok(TextOutcome {
            record: simulated_record(text),
            simulated: true,
            error: Some(failure),
        })
    }

    /// Analyze a CSV file of reviews through the fallback chain.
    ///
    /// The file is validated locally first: a missing review column or
    /// zero usable rows aborts before any network attempt and is never
    /// papered over with simulated output.
    pub async fn analyze_file(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<FileOutcome, AnalysisError> {
        let content = String::from_utf8_lossy(bytes);
        let reviews = ingest::extract_reviews(&content)?;
        tracing::debug!(reviews = reviews.len(), file = file_name, "extracted reviews");

        let mut last_failure: Option<String> = None;

        // Stage 1: hand the raw file to the CSV-aware endpoint.
        if self.policy.use_csv_endpoint {
            match self.backend.predict_csv(file_name, bytes.to_vec()).await {
                Ok(summary) => {
                    return Ok(FileOutcome {
                        summary,
                        records: Vec::new(),
                        source: BatchSource::CsvEndpoint,
                        simulated_items: 0,
                        error: None,
                    });
                }
                Err(e) => {
                    tracing::debug!("CSV endpoint failed ({}), trying batch endpoint", e);
                    last_failure = Some(e.to_string());
                }
            }
        }

        // Stage 2: one batch request with the locally extracted reviews.
        match self.backend.predict_batch(&reviews).await {
            Ok(results) => {
                let summary =
                    BatchSummary::aggregate(results.iter().map(|p| p.sentiment.as_str()));
                return Ok(FileOutcome {
                    summary,
                    records: Vec::new(),
                    source: BatchSource::BatchEndpoint,
                    simulated_items: 0,
                    error: None,
                });
            }
            Err(e) => {
                tracing::debug!("Batch endpoint failed ({}), trying per-item", e);
                last_failure = Some(e.to_string());
            }
        }

        // Stage 3: sequential per-item predictions, capped to bound fan-out.
        let cap = self.policy.per_item_cap.min(reviews.len());
        let mut records = Vec::with_capacity(cap);
        let mut simulated_items = 0;
        let mut real_items = 0;

        for review in reviews.iter().take(cap) {
            let record = match self.backend.predict(review).await {
                Ok(prediction) => match Sentiment::parse(&prediction.sentiment) {
                    Some(sentiment) => {
                        real_items += 1;
                        SentimentRecord::new(sentiment, prediction.confidence, review)
                    }
                    None => {
                        if !self.policy.simulate_on_failure {
                            return Err(AnalysisError::Backend(format!(
                                "Unrecognized sentiment label: {}",
                                prediction.sentiment
                            )));
                        }
                        simulated_items += 1;
                        simulated_record(review)
                    }
                },
                Err(e) => {
                    if !self.policy.simulate_on_failure {
                        return Err(AnalysisError::Backend(e.to_string()));
                    }
                    simulated_items += 1;
                    simulated_record(review)
                }
            };
            records.push(record);
        }

        if real_items > 0 {
            let summary =
                BatchSummary::from_sentiments(records.iter().map(|r| r.sentiment));
            return Ok(FileOutcome {
                summary,
                records,
                source: BatchSource::PerItem,
                simulated_items,
                error: last_failure,
            });
        }

        // Stage 4: nothing reached the backend at all.
        if !self.policy.simulate_on_failure {
            return Err(AnalysisError::Backend(last_failure.unwrap_or_else(|| {
                BackendError::Unavailable.to_string()
            })));
        }

        tracing::warn!(
            reviews = reviews.len(),
            "No network path succeeded, simulating batch summary"
        );
        Ok(FileOutcome {
            summary: BatchSummary::simulated(reviews.len()),
            records: Vec::new(),
            source: BatchSource::Simulated,
            simulated_items: reviews.len(),
            error: last_failure,
        })
    }
}
