/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for the sync-flow tests:
/// - An in-memory store wired to a board and fetcher
/// - Lead seeding helpers with distinct creation times
/// - Polling helper for background continuations

use chrono::{Duration as ChronoDuration, Utc};
use leadgrid_client::board::LeadBoard;
use leadgrid_client::fetcher::{FetcherConfig, LeadFetcher};
use leadgrid_client::session::ViewerContext;
use leadgrid_client::store::memory::MemoryStore;
use leadgrid_shared::models::lead::Lead;
use leadgrid_shared::models::status::LeadStatus;
use leadgrid_shared::models::viewer::{Role, SubordinateSet, Viewer};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{sleep, Duration, Instant};
use uuid::Uuid;

/// Test harness around one viewer session
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub board: Arc<LeadBoard>,
    pub fetcher: Arc<LeadFetcher<MemoryStore>>,
    pub context: ViewerContext,
}

impl TestContext {
    /// Builds an admin session over an empty store
    pub async fn admin(page_size: usize, max_pages: usize) -> Self {
        let viewer = Viewer {
            id: Uuid::new_v4(),
            display_name: "Root".to_string(),
            role: Role::Admin,
        };
        Self::for_viewer(viewer, SubordinateSet::empty(), page_size, max_pages).await
    }

    /// Builds a session for an arbitrary viewer
    pub async fn for_viewer(
        viewer: Viewer,
        subordinates: SubordinateSet,
        page_size: usize,
        max_pages: usize,
    ) -> Self {
        let store = Arc::new(MemoryStore::new());
        store
            .set_statuses(vec![
                LeadStatus {
                    id: 1,
                    name: "new".to_string(),
                },
                LeadStatus {
                    id: 2,
                    name: "contacted".to_string(),
                },
                LeadStatus {
                    id: 3,
                    name: "qualified".to_string(),
                },
            ])
            .await;

        let board = Arc::new(LeadBoard::new());
        let context = ViewerContext::new(viewer, subordinates);
        let fetcher = Arc::new(LeadFetcher::with_config(
            Arc::clone(&store),
            Arc::clone(&board),
            context.clone(),
            FetcherConfig {
                page_size,
                max_pages,
            },
        ));

        TestContext {
            store,
            board,
            fetcher,
            context,
        }
    }
}

/// Seeds `count` leads with strictly descending creation times
pub fn sample_leads(count: usize) -> Vec<Lead> {
    let base = Utc::now();
    (0..count)
        .map(|i| Lead {
            id: Uuid::new_v4(),
            first_name: format!("Lead{}", i),
            last_name: "Sample".to_string(),
            email: None,
            phone: None,
            status: "new".to_string(),
            assigned_to: None,
            desk: None,
            is_converted: false,
            created_at: base - ChronoDuration::seconds(i as i64),
        })
        .collect()
}

/// Polls a condition until it holds or the timeout expires
pub async fn wait_for<F, Fut>(mut condition: F, timeout_secs: u64) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + Duration::from_secs(timeout_secs);
    while Instant::now() < deadline {
        if condition().await {
            return Ok(());
        }
        sleep(Duration::from_millis(10)).await;
    }
    anyhow::bail!("condition not met within {}s", timeout_secs)
}
