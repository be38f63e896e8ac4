//! # LeadGrid Client
//!
//! Runs the lead sync flow against the hosted record store: resolves the
//! viewer context, performs the initial paginated fetch, then keeps the
//! displayed collection fresh from change notifications until shutdown.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p leadgrid-client
//! ```

use leadgrid_client::board::LeadBoard;
use leadgrid_client::config::Config;
use leadgrid_client::feed::{feed_channel, ChangeListener};
use leadgrid_client::fetcher::LeadFetcher;
use leadgrid_client::session::ViewerContext;
use leadgrid_client::store::rest::RestStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadgrid_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "LeadGrid client v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let store = Arc::new(RestStore::new(
        &config.store.base_url,
        &config.store.api_key,
        &config.store.access_token,
    ));

    let viewer = config.viewer();
    tracing::info!(viewer = %viewer.id, role = viewer.role.as_str(), "resolving viewer context");
    let context = ViewerContext::load(store.as_ref(), viewer).await?;

    let board = Arc::new(LeadBoard::new());
    let fetcher = Arc::new(LeadFetcher::with_config(
        Arc::clone(&store),
        Arc::clone(&board),
        context,
        config.fetcher_config(),
    ));
    let shutdown = fetcher.shutdown_token();

    let displayed = fetcher.refresh().await?;
    tracing::info!(displayed, "initial page displayed, remaining pages loading in background");

    // The realtime transport (external to this binary) pushes change
    // notifications into this channel; each one triggers a refetch.
    let (_changes_tx, changes_rx) = feed_channel(64);
    let listener = ChangeListener::new(changes_rx, Arc::clone(&fetcher), shutdown.clone());
    let listener_handle = tokio::spawn(listener.run());

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, exiting...");
    shutdown.cancel();
    let _ = listener_handle.await;

    tracing::info!(leads = board.len().await, "final displayed count");
    Ok(())
}
