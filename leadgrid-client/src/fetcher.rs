/// Paginated lead fetcher
///
/// This module implements the incremental lead load: the first page is
/// fetched synchronously and displayed as soon as it is filtered; the
/// remaining pages stream in as a best-effort background continuation
/// that never blocks the caller.
///
/// # Fetch Lifecycle
///
/// ```text
/// refresh()
///   ├─> rotate generation (cancel the previous one)
///   ├─> fetch page 0; on error the board keeps its last known rows
///   ├─> filter, replace the board, return displayed count
///   └─> spawn continuation (pages 1..cap)
///         ├─> stop on cancellation, error, empty page, or short page
///         └─> warn and stop at the page cap
/// ```
///
/// # Generations
///
/// Every `refresh` supersedes the previous one: the old generation's
/// token is cancelled before the fresh fetch touches the board, so a
/// continuation still in flight can neither block the fresh fetch nor
/// leak stale rows into it. Continuation failures halt the continuation
/// and keep whatever was already merged; the caller decides when to try
/// again.
///
/// # Example
///
/// ```no_run
/// use leadgrid_client::board::LeadBoard;
/// use leadgrid_client::fetcher::LeadFetcher;
/// use leadgrid_client::session::ViewerContext;
/// use leadgrid_client::store::rest::RestStore;
/// use leadgrid_shared::models::viewer::{Role, SubordinateSet, Viewer};
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(RestStore::new("https://records.example.com/rest/v1", "key", "token"));
/// let board = Arc::new(LeadBoard::new());
/// let context = ViewerContext::new(
///     Viewer { id: Uuid::new_v4(), display_name: "Root".to_string(), role: Role::Admin },
///     SubordinateSet::empty(),
/// );
///
/// let fetcher = LeadFetcher::new(store, board.clone(), context);
/// let displayed = fetcher.refresh().await?;
/// println!("{} leads visible, more loading in the background", displayed);
/// # Ok(())
/// # }
/// ```

use crate::board::LeadBoard;
use crate::session::ViewerContext;
use crate::store::{PageRequest, RecordStore, StoreError};
use leadgrid_shared::visibility::filter_visible;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Fetch errors surfaced to the caller
///
/// Only the synchronous first page can fail a `refresh`; background page
/// failures are logged and halt the continuation instead.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The first page could not be fetched
    #[error("initial page fetch failed: {0}")]
    Store(#[from] StoreError),
}

/// Fetcher configuration
#[derive(Debug, Clone, Copy)]
pub struct FetcherConfig {
    /// Records per page request
    pub page_size: usize,

    /// Safety cap on page requests per fetch
    pub max_pages: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig {
            page_size: 1000,
            max_pages: 100,
        }
    }
}

/// Incremental lead loader for one viewer session
pub struct LeadFetcher<S: RecordStore> {
    store: Arc<S>,
    board: Arc<LeadBoard>,
    context: ViewerContext,
    config: FetcherConfig,

    /// Root token; cancelling it stops every generation
    shutdown: CancellationToken,

    /// Token of the generation currently allowed to merge
    generation: Mutex<CancellationToken>,
}

impl<S: RecordStore + 'static> LeadFetcher<S> {
    /// Creates a fetcher with the default page size and cap
    pub fn new(store: Arc<S>, board: Arc<LeadBoard>, context: ViewerContext) -> Self {
        Self::with_config(store, board, context, FetcherConfig::default())
    }

    /// Creates a fetcher with custom pagination settings
    pub fn with_config(
        store: Arc<S>,
        board: Arc<LeadBoard>,
        context: ViewerContext,
        config: FetcherConfig,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let generation = Mutex::new(shutdown.child_token());
        LeadFetcher {
            store,
            board,
            context,
            config,
            shutdown,
            generation,
        }
    }

    /// Token that stops all fetching when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// The displayed collection this fetcher feeds
    pub fn board(&self) -> Arc<LeadBoard> {
        Arc::clone(&self.board)
    }

    /// Runs a fresh fetch, superseding any fetch still in flight
    ///
    /// Loads the first page, replaces the board with its visible leads,
    /// and returns the number displayed so far. If the first page was
    /// full, the remaining pages continue loading in the background. A
    /// first-page failure leaves the board at its last known rows.
    pub async fn refresh(&self) -> Result<usize, FetchError> {
        let generation = self.rotate_generation().await;

        let first = self
            .store
            .fetch_leads_page(PageRequest::page(0, self.config.page_size))
            .await?;
        let fetched = first.len();

        let visible = filter_visible(first, &self.context.viewer, &self.context.subordinates);
        let displayed = self.board.replace(&generation, visible).await;
        tracing::debug!(fetched, displayed, "first page displayed");

        if fetched == self.config.page_size {
            if self.config.max_pages > 1 {
                let store = Arc::clone(&self.store);
                let board = Arc::clone(&self.board);
                let context = self.context.clone();
                let config = self.config;
                tokio::spawn(async move {
                    continuation(store, board, context, config, generation).await;
                });
            } else {
                tracing::warn!(pages = self.config.max_pages, "page cap reached, not all leads were fetched");
            }
        }

        Ok(displayed)
    }

    /// Cancels the current generation and installs its successor
    async fn rotate_generation(&self) -> CancellationToken {
        let mut current = self.generation.lock().await;
        current.cancel();
        let next = self.shutdown.child_token();
        *current = next.clone();
        next
    }
}

/// Background page loop for one generation
async fn continuation<S: RecordStore>(
    store: Arc<S>,
    board: Arc<LeadBoard>,
    context: ViewerContext,
    config: FetcherConfig,
    generation: CancellationToken,
) {
    for page_index in 1..config.max_pages {
        if generation.is_cancelled() {
            tracing::debug!(page = page_index, "continuation superseded, stopping");
            return;
        }

        let batch = match store
            .fetch_leads_page(PageRequest::page(page_index, config.page_size))
            .await
        {
            Ok(batch) => batch,
            Err(error) => {
                tracing::warn!(page = page_index, %error, "background page fetch failed, halting continuation");
                return;
            }
        };

        let fetched = batch.len();
        if fetched == 0 {
            tracing::debug!(page = page_index, "empty page, fetch complete");
            return;
        }

        let visible = filter_visible(batch, &context.viewer, &context.subordinates);
        board.merge(&generation, visible).await;

        if fetched < config.page_size {
            tracing::debug!(page = page_index, fetched, "short page, fetch complete");
            return;
        }
    }

    tracing::warn!(pages = config.max_pages, "page cap reached, not all leads were fetched");
}
