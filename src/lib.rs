//! # Moodify
//!
//! Review sentiment dashboard client: analyze a single review text or a
//! CSV of reviews against a remote sentiment-classification backend, and
//! keep a session-local dashboard state (last result, batch summary,
//! rolling history, aggregate stats).
//!
//! ## Modules
//!
//! - [`sentiment`]: The fixed label set, normalization, records, summaries
//! - [`ingest`]: Local CSV review extraction
//! - [`backend`]: HTTP client for the sentiment service
//! - [`pipeline`]: Request dispatcher with the ordered fallback chain
//! - [`session`]: The state container the presentation layer reads
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use moodify::backend::{BackendClient, BackendConfig};
//! use moodify::pipeline::{AnalysisPolicy, Analyzer};
//! use moodify::session::{Session, SessionConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = Arc::new(BackendClient::new(BackendConfig::default()));
//!     let analyzer = Analyzer::new(backend.clone(), AnalysisPolicy::default());
//!     let mut session = Session::new(backend, analyzer, SessionConfig::default());
//!
//!     let outcome = session.analyze("This is great!").await?;
//!     println!(
//!         "{} ({:.0}% confidence)",
//!         outcome.record.sentiment,
//!         outcome.record.confidence * 100.0
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod ingest;
pub mod pipeline;
pub mod sentiment;
pub mod session;

// Re-export top-level types for convenience
pub use sentiment::{BatchSummary, Polarity, Sentiment, SentimentRecord};

pub use ingest::{extract_reviews, IngestError};

pub use backend::{
    BackendClient, BackendError, HistoryEntry, Prediction, SentimentBackend,
};

pub use pipeline::{
    AnalysisError, AnalysisPolicy, Analyzer, BatchSource, FileOutcome, TextOutcome,
};

pub use session::{Session, SessionConfig, SessionError};

pub use config::{
    Config, ConfigError, BackendConfig as ConfigBackendConfig, AnalysisConfig, LoggingConfig,
};
