//! Review CSV Extraction
//!
//! A deliberately small quote-aware field splitter. A double quote toggles
//! the in-quotes flag, so a comma inside quotes is not a separator. Doubled
//! quotes (`""`) are two toggles, not an RFC 4180 escape; that shortcut is
//! kept on purpose for compatibility with the files this tool already
//! accepts.

use super::IngestError;

/// Header names accepted as the review column, matched lower-cased and
/// trimmed; the first positional match wins.
pub const REVIEW_COLUMNS: &[&str] = &["review", "text", "content"];

/// Split one CSV line into trimmed fields, honoring quoted commas.
///
/// Quote characters themselves are consumed by the toggle and do not
/// appear in the output fields.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Strip one leading and one trailing single or double quote.
fn strip_outer_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

/// Extract the review strings from CSV content.
///
/// Line 0 (after skipping blank lines) is always consumed as the header.
/// Rows whose extracted value is empty are dropped. Fails if no accepted
/// review column exists or if zero reviews survive extraction.
pub fn extract_reviews(content: &str) -> Result<Vec<String>, IngestError> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());

    let header = lines.next().ok_or(IngestError::MissingReviewColumn)?;
    let review_idx = split_csv_line(header)
        .iter()
        .position(|h| REVIEW_COLUMNS.contains(&h.to_lowercase().as_str()))
        .ok_or(IngestError::MissingReviewColumn)?;

    let reviews: Vec<String> = lines
        .map(|line| {
            split_csv_line(line)
                .get(review_idx)
                .map(|field| strip_outer_quotes(field).to_string())
                .unwrap_or_default()
        })
        .filter(|review| !review.is_empty())
        .collect();

    if reviews.is_empty() {
        return Err(IngestError::NoReviews);
    }

    Ok(reviews)
}
