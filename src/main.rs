//! Moodify CLI
//!
//! Command-line dashboard for the sentiment backend:
//! - Analyze a single review text
//! - Analyze a CSV file of reviews
//! - Show analysis history and aggregate stats
//! - Check backend availability

use clap::{Parser, Subcommand};
use moodify::backend::{BackendClient, BackendConfig, SentimentBackend};
use moodify::config::{self, Config};
use moodify::pipeline::{AnalysisPolicy, Analyzer, BatchSource, FileOutcome};
use moodify::sentiment::BatchSummary;
use moodify::session::{Session, SessionConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "moodify")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Review sentiment dashboard client")]
#[command(
    long_about = "Moodify analyzes review text against a remote sentiment-classification backend.\nWhen the backend is unreachable it falls back to simulated results (demo mode)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Sentiment backend URL (overrides config)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    format: String,

    /// Path to a config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single review text
    Analyze {
        /// The review text
        text: String,
    },

    /// Analyze a CSV file of reviews
    File {
        /// Path to a CSV file with a 'review', 'text', or 'content' column
        path: PathBuf,
    },

    /// Show recent analyses from the backend
    History {
        /// Maximum entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show aggregate dashboard stats
    Stats,

    /// Check backend availability
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.backend_url {
        config.backend.url = url.clone();
    }

    init_logging(&config.logging);

    let backend = Arc::new(BackendClient::new(BackendConfig {
        base_url: config.backend.url.clone(),
        request_timeout_ms: config.backend.request_timeout_ms,
        max_retries: config.backend.max_retries,
    }));

    match cli.command {
        Commands::Analyze { text } => {
            let mut session = build_session(backend, &config);
            let outcome = session.analyze(&text).await?;

            match cli.format.as_str() {
                "json" => {
                    let value = serde_json::json!({
                        "sentiment": outcome.record.sentiment,
                        "polarity": outcome.record.sentiment.polarity(),
                        "confidence": outcome.record.confidence,
                        "text": outcome.record.text,
                        "timestamp": outcome.record.timestamp,
                        "simulated": outcome.simulated,
                    });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                _ => {
                    if outcome.simulated {
                        println!("Demo mode: backend unavailable, showing a simulated result.");
                    }
                    println!(
                        "Sentiment: {} ({:.0}% confidence)",
                        outcome.record.sentiment,
                        outcome.record.confidence * 100.0
                    );
                }
            }
        }

        Commands::File { path } => {
            if !path.exists() {
                eprintln!("File not found: {:?}", path);
                std::process::exit(1);
            }
            let bytes = std::fs::read(&path)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "reviews.csv".to_string());

            let mut session = build_session(backend, &config);
            let outcome = session.analyze_file(&file_name, &bytes).await?;

            match cli.format.as_str() {
                "json" => {
                    let value = serde_json::json!({
                        "summary": outcome.summary,
                        "source": source_name(outcome.source),
                        "simulated_items": outcome.simulated_items,
                    });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                _ => print_file_outcome(&outcome),
            }
        }

        Commands::History { limit } => {
            let entries = backend.history().await?;
            let entries = &entries[..entries.len().min(limit)];

            match cli.format.as_str() {
                "json" => {
                    let value: Vec<serde_json::Value> = entries
                        .iter()
                        .map(|e| {
                            serde_json::json!({
                                "text": e.text,
                                "sentiment": e.sentiment,
                                "confidence": e.confidence,
                                "timestamp": e.timestamp,
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                "csv" => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    writer.write_record(["timestamp", "sentiment", "confidence", "text"])?;
                    for entry in entries {
                        let confidence = format!("{:.4}", entry.confidence);
                        writer.write_record([
                            entry.timestamp.as_str(),
                            entry.sentiment.as_str(),
                            confidence.as_str(),
                            entry.text.as_str(),
                        ])?;
                    }
                    writer.flush()?;
                }
                _ => {
                    if entries.is_empty() {
                        println!("No analyses recorded yet.");
                    } else {
                        println!(
                            "{:<22} {:<15} {:<6} {}",
                            "Time", "Sentiment", "Conf", "Text"
                        );
                        println!("{}", "-".repeat(70));
                        for entry in entries {
                            println!(
                                "{:<22} {:<15} {:<6.2} {}",
                                entry.timestamp,
                                entry.sentiment,
                                entry.confidence,
                                truncate(&entry.text, 40)
                            );
                        }
                    }
                }
            }
        }

        Commands::Stats => {
            let stats = backend.stats().await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
                _ => {
                    // Print known fields when present; the shape is
                    // backend-defined otherwise.
                    match (
                        stats["total"].as_u64(),
                        stats["positive"].as_u64(),
                        stats["negative"].as_u64(),
                        stats["neutral"].as_u64(),
                    ) {
                        (Some(total), Some(positive), Some(negative), Some(neutral)) => {
                            println!("Total analyses: {}", total);
                            println!("  Positive: {}", positive);
                            println!("  Neutral:  {}", neutral);
                            println!("  Negative: {}", negative);
                        }
                        _ => println!("{}", serde_json::to_string_pretty(&stats)?),
                    }
                }
            }
        }

        Commands::Status => match backend.health_check().await {
            Ok(()) => println!("Backend reachable at {}", config.backend.url),
            Err(e) => {
                eprintln!("Cannot reach sentiment backend at {}", config.backend.url);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Config { output } => {
            let content = config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }
    }

    Ok(())
}

fn build_session(backend: Arc<BackendClient>, config: &Config) -> Session {
    let policy = AnalysisPolicy {
        simulate_on_failure: config.analysis.simulate_on_failure,
        use_csv_endpoint: config.analysis.use_csv_endpoint,
        per_item_cap: config.analysis.per_item_cap,
    };
    let analyzer = Analyzer::new(backend.clone(), policy);
    Session::new(
        backend,
        analyzer,
        SessionConfig {
            history_cap: config.analysis.history_cap,
            max_text_len: config.analysis.max_text_len,
            refresh_after_analyze: config.analysis.refresh_after_analyze,
        },
    )
}

fn init_logging(config: &moodify::config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("moodify={}", config.level)),
    );

    if config.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn print_file_outcome(outcome: &FileOutcome) {
    match outcome.source {
        BatchSource::Simulated => println!(
            "Demo mode: backend unavailable, showing simulated results for {} reviews.",
            outcome.summary.total
        ),
        BatchSource::PerItem if outcome.simulated_items > 0 => println!(
            "Analyzed {} reviews ({} simulated while the backend was flaky).",
            outcome.summary.total, outcome.simulated_items
        ),
        _ => println!("Analyzed {} reviews.", outcome.summary.total),
    }
    println!();
    print_summary(&outcome.summary);
}

fn print_summary(summary: &BatchSummary) {
    println!("{:<15} {}", "Bucket", "Count");
    println!("{}", "-".repeat(22));
    println!("{:<15} {}", "very_positive", summary.very_positive);
    println!("{:<15} {}", "positive", summary.positive);
    println!("{:<15} {}", "neutral", summary.neutral);
    println!("{:<15} {}", "negative", summary.negative);
    println!("{:<15} {}", "very_negative", summary.very_negative);
    println!("{}", "-".repeat(22));
    println!("{:<15} {}", "total", summary.total);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

fn source_name(source: BatchSource) -> &'static str {
    match source {
        BatchSource::CsvEndpoint => "csv_endpoint",
        BatchSource::BatchEndpoint => "batch_endpoint",
        BatchSource::PerItem => "per_item",
        BatchSource::Simulated => "simulated",
    }
}
