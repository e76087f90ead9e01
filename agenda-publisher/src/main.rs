mod config;
mod github;
mod scheduler;
mod storage;

use agenda_shared::StatusPagePublisher;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::PublisherConfig;
use crate::github::GithubContentsClient;
use crate::scheduler::{Clock, PublishScheduler, SystemClock};

#[derive(Parser)]
#[command(name = "agenda-publisher")]
#[command(about = "Publishes a status page announcing the next meeting")]
#[command(
    long_about = "Finds the next meeting's agenda in the agenda repository, renders its dates \
    and location into the page template and publishes the result to object storage.\n\n\
    Without flags the page is republished on a fixed interval until interrupted."
)]
struct Cli {
    /// Publish once and exit instead of running on a schedule.
    #[arg(long)]
    once: bool,

    /// Render the page and print it to stdout without publishing.
    #[arg(long, conflicts_with = "once")]
    print: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agenda_publisher=info,agenda_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = PublisherConfig::from_env()?;

    tracing::info!(
        "Starting agenda publisher for {}/{}",
        config.repo.owner,
        config.repo.name
    );

    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let source = GithubContentsClient::new(
        http.clone(),
        config.github_api_url.clone(),
        config.repo.owner.clone(),
        config.repo.name.clone(),
    )
    .with_token(config.github_token.clone());
    let store = storage::from_config(&config.storage, http);

    let publisher = Arc::new(StatusPagePublisher::new(
        Arc::new(source),
        store,
        config.repo.clone(),
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if cli.print {
        // Failures here are for a human at a terminal, so surface them
        let page = publisher.render_page(clock.now()).await?;
        println!("{}", page.html);
        return Ok(());
    }

    let scheduler = PublishScheduler::new(publisher, clock, config.publish_interval);

    if cli.once {
        if let Some(outcome) = scheduler.run_once().await {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        return Ok(());
    }

    let scheduler_handle = tokio::spawn(async move {
        scheduler.run().await;
    });

    // Wait for shutdown signal
    tracing::info!("Agenda publisher running. Press Ctrl+C to stop.");
    signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping...");

    scheduler_handle.abort();

    tracing::info!("Agenda publisher stopped");
    Ok(())
}
