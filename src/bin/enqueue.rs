//! CLI producer for url-processor.
//!
//! Queues shorten-URL jobs directly, standing in for the HTTP front end
//! during development and operations.
//!
//! # Usage
//!
//! ```bash
//! # Queue a single URL
//! cargo run --bin enqueue -- https://www.example.com/very/long/url
//!
//! # Queue several URLs under a custom base
//! cargo run --bin enqueue -- -b https://sho.rt/ https://a.example/1 https://b.example/2
//! ```
//!
//! # Environment Variables
//!
//! - `QUEUE_URL` (required): Redis connection string
//! - `QUEUE_NAME` (optional): queue key namespace, default `url-processing`

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use url_processor::domain::entities::ShortenJob;
use url_processor::domain::transport::MESSAGE_TYPE_URL_PROCESSING;
use url_processor::infrastructure::queue::RedisQueue;
use url_processor::utils::code_generator::generate_code;

/// Queue URLs for asynchronous shortening.
#[derive(Parser)]
#[command(name = "enqueue")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URLs to shorten (must start with http:// or https://)
    #[arg(required = true)]
    urls: Vec<String>,

    /// Base URL the short links are built under
    #[arg(short, long, default_value = "https://short.ly/")]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    for url in &cli.urls {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("URL must start with http:// or https://: {url}");
        }
    }

    let queue_url = std::env::var("QUEUE_URL").context("QUEUE_URL must be set")?;
    let queue_name =
        std::env::var("QUEUE_NAME").unwrap_or_else(|_| "url-processing".to_string());

    let queue = RedisQueue::connect(&queue_url, &queue_name)
        .await
        .context("Failed to connect to queue")?;

    let base = cli.base_url.trim_end_matches('/');

    for url in cli.urls {
        let short_code = generate_code();
        let job = ShortenJob::new(
            generate_code(),
            short_code.clone(),
            url.clone(),
            format!("{base}/{short_code}"),
            Utc::now(),
        );

        let body = serde_json::to_string(&job).context("Failed to serialize job")?;
        let message_id = queue
            .send(body, MESSAGE_TYPE_URL_PROCESSING)
            .await
            .context("Failed to queue job")?;

        println!("Queued {} -> {} (message {})", url, job.short_url, message_id);
    }

    Ok(())
}
