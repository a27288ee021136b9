//! cf-metadata
//!
//! Loads isolation segment metadata once and prints it.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cf_metadata::{
    HttpPageFetcher, IsolationSegmentMetadataManager, LoadOptions, MetadataConfig,
};

/// Default configuration path
const DEFAULT_CONFIG_PATH: &str = "config/cf-metadata.yaml";

#[derive(Parser, Debug)]
#[command(name = "cf-metadata", about = "Load and print Cloud Foundry isolation segments")]
struct Args {
    /// Configuration file
    #[arg(long, env = "CF_METADATA_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// API base URL (overrides config and CF_API_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Print segments as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cf_metadata=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    tracing::info!(path = %args.config, "Loading configuration");
    let mut config = match args.base_url {
        Some(ref url) if !std::path::Path::new(&args.config).exists() => {
            MetadataConfig::for_base_url(url.clone())
        }
        _ => MetadataConfig::from_file(&args.config)
            .with_context(|| format!("Failed to load {}", args.config))?
            .with_env_overrides(),
    };
    if let Some(url) = args.base_url {
        config.api.base_url = url;
    }

    let fetcher = Arc::new(
        HttpPageFetcher::from_config(&config.api).context("Failed to create HTTP client")?,
    );
    let options = LoadOptions::from_config(config.api.per_page, &config.load);
    let segments = IsolationSegmentMetadataManager::with_options(fetcher, options);

    let report = segments
        .load_all_items()
        .await
        .context("Failed to load isolation segments")?;
    tracing::info!(
        pages = report.pages,
        items = report.items,
        "Isolation segments loaded"
    );

    let mut all = segments.get_all().await;
    all.sort_by(|a, b| a.name().cmp(b.name()));
    let shared = segments.shared_segment().await;

    if args.json {
        let out = serde_json::json!({
            "shared": shared.as_ref(),
            "segments": all.iter().map(|s| s.as_ref()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{:<40} NAME", "GUID");
        for seg in &all {
            println!("{:<40} {}", seg.guid(), seg.name());
        }
        println!();
        println!("shared: {} ({})", shared.name(), shared.guid());
    }

    Ok(())
}
