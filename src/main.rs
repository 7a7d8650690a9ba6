//! shipsignal - CLI entry point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use shipsignal::github::GitHubCommitSource;
use shipsignal::notify::{ChatTransport, LogTransport, Notifier, TelegramTransport};
use shipsignal::sentiment::{Classifier, HuggingFaceSummarizer};
use shipsignal::{Config, Monitor};

/// Watch GitHub repositories and post commit sentiment alerts to Telegram.
#[derive(Parser, Debug)]
#[command(name = "shipsignal")]
#[command(about = "Watch GitHub repositories and post commit sentiment alerts to Telegram")]
#[command(version)]
struct Cli {
    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Log alerts instead of sending them to Telegram
    #[arg(long)]
    dry_run: bool,

    /// Seconds between poll cycles (overrides SHIPSIGNAL_POLL_INTERVAL)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env before the subscriber so RUST_LOG can come from it.
    let dotenv_error = dotenv_problem(dotenvy::dotenv());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Some(e) = dotenv_error {
        warn!("Ignoring .env file: {}", e);
    }

    let config = Config::from_env().context("Invalid configuration")?;
    info!("Loaded configuration: {:?}", config);

    let source = GitHubCommitSource::new(&config.github_token, config.github_api_url.as_deref())
        .context("Failed to create GitHub client")?
        .with_timeout(config.fetch_timeout);

    let summarizer =
        HuggingFaceSummarizer::new(&config.summarizer_url, config.hf_api_token.clone())
            .context("Failed to create summarizer client")?;

    let transport: Arc<dyn ChatTransport> = if cli.dry_run {
        Arc::new(LogTransport)
    } else {
        Arc::new(
            TelegramTransport::new(
                &config.telegram_api_url,
                &config.telegram_bot_token,
                &config.telegram_chat_id,
            )
            .context("Failed to create Telegram client")?,
        )
    };

    let interval = cli
        .interval
        .map(Duration::from_secs)
        .unwrap_or(config.poll_interval);

    let mut monitor = Monitor::new(
        config.repositories.clone(),
        Arc::new(source),
        Classifier::new(Arc::new(summarizer)),
        Notifier::new(transport),
    )
    .with_interval(interval)
    .with_guarantee(config.delivery);

    if cli.once {
        let report = monitor.poll_cycle().await;
        info!(
            "Single cycle done: {} new, {} unchanged, {} fetch failure(s)",
            report.new_commits.len(),
            report.unchanged,
            report.fetch_failures
        );
        return Ok(());
    }

    match monitor.run_supervised(&config.restart_policy).await {
        Ok(never) => match never {},
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}

/// A missing .env file is fine; the environment may already be set.
fn dotenv_problem(result: Result<PathBuf, dotenvy::Error>) -> Option<dotenvy::Error> {
    match result {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}
