//! Command line front end: list upcoming matches, or follow one match live.
//!
//! Logging is controlled through `RUST_LOG` (default `info`).

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use futures::StreamExt as _;
use live_match_feed::discovery::Client as DiscoveryClient;
use live_match_feed::feed::FeedConnection;
use live_match_feed::listing::Client as ListingClient;
use live_match_feed::ws::Config;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "live-match-feed", version, about = "Live football match feed client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print upcoming matches as JSON
    Matches,
    /// Discover the feed for a match and print its live updates until Ctrl-C
    WebSockets {
        /// Event id, as printed by `matches`
        event_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Matches => matches().await,
        Command::WebSockets { event_id } => follow(&event_id).await,
    }
}

#[expect(clippy::print_stdout, reason = "the match list is the command's output")]
async fn matches() -> anyhow::Result<()> {
    let matches = ListingClient::default()
        .matches()
        .await
        .context("unable to fetch match listing")?;

    println!("{}", serde_json::to_string_pretty(&matches)?);

    Ok(())
}

#[expect(clippy::print_stdout, reason = "live updates are the command's output")]
async fn follow(event_id: &str) -> anyhow::Result<()> {
    let target = DiscoveryClient::default().discover(event_id).await?;

    let connection = FeedConnection::new(target, Config::default())?;
    let mut updates = Box::pin(connection.updates());
    connection.connect()?;

    loop {
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                tracing::info!("interrupted, disconnecting");
                break;
            }
            update = updates.next() => match update {
                Some(Ok(update)) => println!("{}", serde_json::to_string(&update)?),
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "update stream interrupted, resubscribing");
                    updates = Box::pin(connection.updates());
                }
                None => break,
            },
        }
    }

    connection.disconnect();

    Ok(())
}
