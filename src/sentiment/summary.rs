//! Batch Summaries
//!
//! Aggregation of per-item predictions into five-bucket counts, plus the
//! fully simulated summary used when no network path succeeds.

use super::Sentiment;
use serde::{Deserialize, Serialize};

/// Proportions used for simulated summaries, in bucket order
/// (very_positive, positive, neutral, negative, very_negative).
const SIMULATED_PROPORTIONS: [f64; 5] = [0.35, 0.25, 0.15, 0.12, 0.08];

/// Five-bucket summary of a batch analysis.
///
/// Invariant: `total` always equals the sum of the bucket counts.
/// Labels that fail normalization are excluded from the buckets and
/// from `total` alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub very_positive: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub very_negative: usize,
    pub total: usize,
}

impl BatchSummary {
    /// Count one sentiment into its bucket.
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::VeryPositive => self.very_positive += 1,
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::VeryNegative => self.very_negative += 1,
        }
        self.total += 1;
    }

    /// Aggregate raw label strings into a summary.
    ///
    /// Unrecognized labels are dropped entirely; they count toward
    /// neither a bucket nor `total`.
    pub fn aggregate<'a, I>(labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut summary = Self::default();
        for label in labels {
            match Sentiment::parse(label) {
                Some(sentiment) => summary.record(sentiment),
                None => {
                    tracing::debug!("Dropping unrecognized sentiment label: {:?}", label);
                }
            }
        }
        summary
    }

    /// Fold a list of already-normalized sentiments into a summary.
    pub fn from_sentiments<I>(sentiments: I) -> Self
    where
        I: IntoIterator<Item = Sentiment>,
    {
        let mut summary = Self::default();
        for sentiment in sentiments {
            summary.record(sentiment);
        }
        summary
    }

    /// Build a simulated summary for `items` reviews.
    ///
    /// Buckets get fixed proportions of the item count; the rounding
    /// remainder is folded into neutral so the counts always reconcile
    /// exactly with `total`.
    pub fn simulated(items: usize) -> Self {
        let counts: Vec<usize> = SIMULATED_PROPORTIONS
            .iter()
            .map(|p| (items as f64 * p).floor() as usize)
            .collect();

        let mut summary = Self {
            very_positive: counts[0],
            positive: counts[1],
            neutral: counts[2],
            negative: counts[3],
            very_negative: counts[4],
            total: items,
        };
        summary.neutral += items - counts.iter().sum::<usize>();
        summary
    }

    /// Sum of the five bucket counts.
    pub fn bucket_sum(&self) -> usize {
        self.very_positive + self.positive + self.neutral + self.negative + self.very_negative
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_counts_buckets() {
        let labels = [
            "Very Positive",
            "positive",
            "positive",
            "Neutral",
            "negative",
            "very_negative",
            "verynegative",
        ];
        let summary = BatchSummary::aggregate(labels.iter().copied());

        assert_eq!(summary.very_positive, 1);
        assert_eq!(summary.positive, 2);
        assert_eq!(summary.neutral, 1);
        assert_eq!(summary.negative, 1);
        assert_eq!(summary.very_negative, 2);
        assert_eq!(summary.total, 7);
        assert_eq!(summary.total, summary.bucket_sum());
    }

    #[test]
    fn test_aggregate_drops_unknown_labels() {
        let labels = ["positive", "banana", "negative", ""];
        let summary = BatchSummary::aggregate(labels.iter().copied());

        assert_eq!(summary.positive, 1);
        assert_eq!(summary.negative, 1);
        // Unknown labels increment neither a bucket nor the total
        assert_eq!(summary.total, 2);
        assert_eq!(summary.total, summary.bucket_sum());
    }

    #[test]
    fn test_simulated_reconciles_exactly() {
        for items in [0, 1, 7, 10, 99, 100, 1234] {
            let summary = BatchSummary::simulated(items);
            assert_eq!(summary.total, items, "total for {} items", items);
            assert_eq!(
                summary.bucket_sum(),
                items,
                "bucket sum for {} items",
                items
            );
        }
    }

    #[test]
    fn test_simulated_proportions() {
        let summary = BatchSummary::simulated(100);
        assert_eq!(summary.very_positive, 35);
        assert_eq!(summary.positive, 25);
        // 15% plus the (zero) remainder at a round count
        assert_eq!(summary.neutral, 15);
        assert_eq!(summary.negative, 12);
        assert_eq!(summary.very_negative, 8);
    }

    #[test]
    fn test_empty() {
        assert!(BatchSummary::default().is_empty());
        assert!(!BatchSummary::simulated(3).is_empty());
    }
}
