use std::env;

use tracing_subscriber::EnvFilter;
use url_processor::{config, worker};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!("=== URL Processing Service ===");

    let config = config::load_from_env().inspect_err(|e| {
        tracing::error!("Configuration error: {e:#}");
    })?;
    config.print_summary();

    worker::run(config).await.inspect_err(|e| {
        tracing::error!("Fatal worker error: {e:#}");
    })
}
