//! Demo-Mode Synthesis
//!
//! Plausible results shown when the backend is unreachable, so the
//! dashboard stays usable offline. Callers always flag these outcomes as
//! simulated; only batch-summary proportions live in
//! [`BatchSummary::simulated`](crate::sentiment::BatchSummary::simulated).

use crate::sentiment::{Sentiment, SentimentRecord};
use rand::Rng;

/// Simulated results only use the coarse labels.
const SIMULATED_LABELS: [Sentiment; 3] =
    [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

const CONFIDENCE_RANGE: std::ops::Range<f64> = 0.75..0.95;

/// Synthesize a record for one text: uniform coarse label, confidence in
/// the fixed plausible range.
pub fn simulated_record(text: &str) -> SentimentRecord {
    let mut rng = rand::thread_rng();
    let sentiment = SIMULATED_LABELS[rng.gen_range(0..SIMULATED_LABELS.len())];
    let confidence = rng.gen_range(CONFIDENCE_RANGE);
    SentimentRecord::new(sentiment, confidence, text)
}
