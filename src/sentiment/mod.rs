//! Sentiment Domain Model
//!
//! The fixed internal label set, analysis records, and batch summaries.
//! Raw backend labels are normalized into [`Sentiment`] before anything
//! is stored; records never carry unmapped label text.

mod label;
mod summary;

pub use label::{Polarity, Sentiment};
pub use summary::BatchSummary;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed sentiment analysis of a single text.
///
/// Immutable after creation. Confidence is clamped into `[0, 1]` on
/// construction so downstream consumers never see out-of-range values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl SentimentRecord {
    /// Create a record stamped with the current time.
    pub fn new(sentiment: Sentiment, confidence: f64, text: &str) -> Self {
        Self::with_timestamp(sentiment, confidence, text, Utc::now())
    }

    /// Create a record with an explicit timestamp (backend history entries).
    pub fn with_timestamp(
        sentiment: Sentiment,
        confidence: f64,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sentiment,
            confidence: confidence.clamp(0.0, 1.0),
            text: text.to_string(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamped() {
        let high = SentimentRecord::new(Sentiment::Positive, 1.7, "great");
        assert_eq!(high.confidence, 1.0);

        let low = SentimentRecord::new(Sentiment::Negative, -0.2, "bad");
        assert_eq!(low.confidence, 0.0);

        let ok = SentimentRecord::new(Sentiment::Neutral, 0.92, "fine");
        assert_eq!(ok.confidence, 0.92);
    }
}
