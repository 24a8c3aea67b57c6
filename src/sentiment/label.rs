//! Sentiment Labels
//!
//! Normalization from the backend's label text into the fixed internal
//! five-class set. The backend variants in the wild return snake_case
//! ("very_positive"), concatenated ("verypositive"), and human-readable
//! ("Very Positive") spellings; all of them must land in the same bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five internal sentiment buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

/// Coarse three-class view of a [`Sentiment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Normalize a raw backend label into the internal label set.
    ///
    /// Lower-cases the input and drops spaces, underscores, and hyphens
    /// before matching, then falls back to substring containment for
    /// human-readable strings like "Somewhat Negative". Returns `None`
    /// for labels that map to no bucket; callers must never count those
    /// toward any bucket.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();

        match folded.as_str() {
            "verypositive" => Some(Self::VeryPositive),
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            "verynegative" => Some(Self::VeryNegative),
            _ if folded.contains("verypositive") => Some(Self::VeryPositive),
            _ if folded.contains("verynegative") => Some(Self::VeryNegative),
            _ if folded.contains("positive") => Some(Self::Positive),
            _ if folded.contains("negative") => Some(Self::Negative),
            _ if folded.contains("neutral") => Some(Self::Neutral),
            _ => None,
        }
    }

    /// Canonical snake_case spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryNegative => "very_negative",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::VeryPositive => "very_positive",
        }
    }

    /// Collapse into the coarse three-class view.
    pub fn polarity(&self) -> Polarity {
        match self {
            Self::VeryPositive | Self::Positive => Polarity::Positive,
            Self::Neutral => Polarity::Neutral,
            Self::Negative | Self::VeryNegative => Polarity::Negative,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
        };
        f.write_str(s)
    }
}
