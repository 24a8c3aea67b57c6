//! Backend REST API Client
//!
//! HTTP implementation of [`SentimentBackend`] against the Flask sentiment
//! service (`/predict`, `/predict/csv`, `/predict/batch`, `/history`,
//! `/stats`).

use super::{HistoryEntry, Prediction, SentimentBackend};
use crate::sentiment::BatchSummary;
use async_trait::async_trait;
use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Confidence used when the backend omits both `confidence` and `score`.
const DEFAULT_CONFIDENCE: f64 = 0.85;

/// Sentiment backend REST client.
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

/// Configuration for the backend client.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL for the sentiment API (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum retry attempts for idempotent GET requests
    pub max_retries: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_ms: 5000,
            max_retries: 3,
        }
    }
}

impl BackendClient {
    /// Create a new client with the given configuration.
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Send a GET request with retry, deserializing the JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.url(path);
        let mut last_error = BackendError::Unavailable;

        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                let delay = std::time::Duration::from_secs((attempt as u64).pow(2));
                tokio::time::sleep(delay).await;
            }

            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    return response.json::<T>().await.map_err(BackendError::Request);
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(BackendError::ApiError {
                        status: status.as_u16(),
                        message: text,
                    });
                }
                Err(e) => {
                    last_error = classify(e);
                    continue;
                }
            }
        }

        Err(last_error)
    }

    /// Send a POST request and deserialize the JSON response.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(classify)?;

        if response.status().is_success() {
            response.json::<T>().await.map_err(BackendError::Request)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(BackendError::ApiError {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[async_trait]
impl SentimentBackend for BackendClient {
    async fn predict(&self, text: &str) -> Result<Prediction, BackendError> {
        // The backend reads `text`, older variants read `review`; send both.
        let body = PredictRequest {
            text: text.to_string(),
            review: text.to_string(),
        };

        let response: PredictResponse = self.post_json("/predict", &body).await?;
        Ok(response.into_prediction())
    }

    async fn predict_csv(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<BatchSummary, BackendError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(BackendError::Request)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/predict/csv"))
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;

        if response.status().is_success() {
            let summary: CsvSummaryResponse =
                response.json().await.map_err(BackendError::Request)?;
            Ok(summary.into_summary())
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(BackendError::ApiError {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    async fn predict_batch(&self, reviews: &[String]) -> Result<Vec<Prediction>, BackendError> {
        let body = BatchRequest {
            reviews: reviews.to_vec(),
        };

        let response: BatchResponse = self.post_json("/predict/batch", &body).await?;
        Ok(response
            .results
            .into_iter()
            .map(PredictResponse::into_prediction)
            .collect())
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, BackendError> {
        self.get_json("/history").await
    }

    async fn stats(&self) -> Result<serde_json::Value, BackendError> {
        self.get_json("/stats").await
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let response = self
            .client
            .get(self.url("/"))
            .send()
            .await
            .map_err(classify)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }
}

fn classify(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::Unavailable
    } else {
        BackendError::Request(e)
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct PredictRequest {
    text: String,
    review: String,
}

#[derive(Debug, Serialize)]
struct BatchRequest {
    reviews: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    sentiment: String,
    confidence: Option<f64>,
    score: Option<f64>,
}

impl PredictResponse {
    fn into_prediction(self) -> Prediction {
        Prediction {
            sentiment: self.sentiment,
            // Some backend variants report confidence under `score`.
            confidence: self.confidence.or(self.score).unwrap_or(DEFAULT_CONFIDENCE),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    results: Vec<PredictResponse>,
}

/// The `/predict/csv` response, tolerating snake_case and camelCase keys.
#[derive(Debug, Deserialize)]
struct CsvSummaryResponse {
    #[serde(default, alias = "veryPositive")]
    very_positive: usize,
    #[serde(default)]
    positive: usize,
    #[serde(default)]
    neutral: usize,
    #[serde(default)]
    negative: usize,
    #[serde(default, alias = "veryNegative")]
    very_negative: usize,
    #[serde(default)]
    total: usize,
}

impl CsvSummaryResponse {
    fn into_summary(self) -> BatchSummary {
        let mut summary = BatchSummary {
            very_positive: self.very_positive,
            positive: self.positive,
            neutral: self.neutral,
            negative: self.negative,
            very_negative: self.very_negative,
            total: self.total,
        };
        // Recompute when the backend omits the total.
        if summary.total == 0 {
            summary.total = summary.bucket_sum();
        }
        summary
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when communicating with the sentiment backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Sentiment backend unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_predict_response_confidence_fallback() {
        let with_confidence: PredictResponse =
            serde_json::from_str(r#"{"sentiment": "Positive", "confidence": 0.92}"#).unwrap();
        assert_eq!(with_confidence.into_prediction().confidence, 0.92);

        let with_score: PredictResponse =
            serde_json::from_str(r#"{"sentiment": "Negative", "score": 0.71}"#).unwrap();
        assert_eq!(with_score.into_prediction().confidence, 0.71);

        let with_neither: PredictResponse =
            serde_json::from_str(r#"{"sentiment": "Neutral"}"#).unwrap();
        assert_eq!(with_neither.into_prediction().confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_csv_summary_snake_case_keys() {
        let response: CsvSummaryResponse = serde_json::from_str(
            r#"{"very_positive": 3, "positive": 2, "neutral": 1, "negative": 1, "very_negative": 1, "total": 8}"#,
        )
        .unwrap();
        let summary = response.into_summary();
        assert_eq!(summary.very_positive, 3);
        assert_eq!(summary.total, 8);
    }

    #[test]
    fn test_csv_summary_camel_case_keys_and_missing_total() {
        let response: CsvSummaryResponse =
            serde_json::from_str(r#"{"veryPositive": 4, "positive": 1, "veryNegative": 2}"#)
                .unwrap();
        let summary = response.into_summary();
        assert_eq!(summary.very_positive, 4);
        assert_eq!(summary.very_negative, 2);
        // Total recomputed from the buckets when absent
        assert_eq!(summary.total, 7);
    }
}
