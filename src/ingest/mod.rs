//! Review Ingestion
//!
//! Local CSV parsing used when the backend's CSV endpoint is unavailable:
//! locates the review column by header name and extracts one review string
//! per non-empty row.

mod review_csv;

pub use review_csv::{extract_reviews, split_csv_line, REVIEW_COLUMNS};

/// Errors from local CSV ingestion.
///
/// Both variants are hard failures: a file that trips one of these never
/// reaches the network and never falls through to simulated output.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("CSV must have a 'review', 'text', or 'content' column")]
    MissingReviewColumn,

    #[error("No valid reviews found in CSV")]
    NoReviews,
}
