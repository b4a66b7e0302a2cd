use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;

use herald::aggregate;
use herald::config::{Config, ConfigError};
use herald::feed::HttpFeedClient;
use herald::render::{render_page, write_page, PageMeta};

#[derive(Parser, Debug)]
#[command(
    name = "herald",
    about = "Merge RSS/Atom feeds into a single static news page"
)]
struct Args {
    /// Configuration file (optional; defaults apply when missing)
    #[arg(long, value_name = "FILE", default_value = "herald.toml")]
    config: PathBuf,

    /// Source list to read instead of the configured one
    #[arg(long, value_name = "FILE")]
    feeds: Option<PathBuf>,

    /// Output path to write instead of the configured one
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the summary line
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(feeds) = args.feeds {
        config.feeds = feeds;
    }
    if let Some(output) = args.output {
        config.output = output;
    }

    let client =
        HttpFeedClient::new(&config.user_agent).context("Failed to build HTTP client")?;

    let aggregation = match aggregate::run(&client, &config).await {
        Ok(aggregation) => aggregation,
        Err(ConfigError::SourcesMissing(path)) => {
            eprintln!("Error: No source list found at {}", path.display());
            eprintln!();
            eprintln!("Create it with the feeds to aggregate, for example:");
            eprintln!(r#"  {{ "sources": [ {{ "url": "https://example.com/feed.xml", "name": "Example", "maxItems": 10 }} ] }}"#);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    for failure in &aggregation.failures {
        eprintln!("Failed: {} {}", failure.url, failure.error);
    }

    let meta = PageMeta {
        title: &config.title,
        description: &config.description,
    };
    let html = render_page(&meta, &aggregation.entries, &aggregation.sources, Utc::now());
    write_page(&config.output, &html)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    println!(
        "Wrote {} items to {}",
        aggregation.len(),
        config.output.display()
    );
    Ok(())
}
