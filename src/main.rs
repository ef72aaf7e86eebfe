use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use sift::config::Config;
use sift::{feed, matcher, report};

/// Get the config directory path (~/.config/sift/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("sift"))
}

#[derive(Parser, Debug)]
#[command(
    name = "sift",
    about = "Sorts syndication feed entries into per-file buckets using substring matching rules"
)]
struct Args {
    /// Name of the feed to process; resolves to <FEED>.json in the config directory
    feed: String,

    /// Directory containing feed config files
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_dir = match args.config_dir {
        Some(dir) => dir,
        None => get_config_dir()?,
    };
    let config_path = config_dir.join(format!("{}.json", args.feed));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;

    let client = reqwest::Client::new();
    let body = feed::load(&client, &config.link)
        .await
        .with_context(|| format!("Failed to load feed from '{}'", config.link))?;

    let mut items = feed::decode(config.feed_type, &body);
    feed::verify_expectations(&config, &items);

    let assignments = matcher::assign(&config.files, &mut items);

    let stdout = std::io::stdout();
    report::render(&mut stdout.lock(), &assignments, &items)
        .context("Failed to write report to stdout")?;

    Ok(())
}
