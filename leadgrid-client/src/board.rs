/// The displayed lead collection
///
/// `LeadBoard` holds the set of leads currently shown to the viewer. Pages
/// merge into it as they arrive; identities already present are skipped,
/// so duplicate delivery (overlapping fetches, a refetch landing mid-load)
/// cannot produce duplicate rows.
///
/// # Generations
///
/// Every write carries the cancellation token of the fetch generation
/// that produced the batch. The token is checked inside the write
/// critical section: once a generation is cancelled, none of its batches
/// can reach the board, even if the cancel raced the write. Since the
/// fetcher cancels the old token before its successor touches the board,
/// a stale continuation can never interleave rows into a fresh
/// generation's view.
///
/// # Example
///
/// ```
/// use leadgrid_client::board::LeadBoard;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(leads: Vec<leadgrid_shared::models::lead::Lead>) {
/// let board = LeadBoard::new();
/// let generation = CancellationToken::new();
///
/// let added = board.merge(&generation, leads.clone()).await;
/// let again = board.merge(&generation, leads).await;
/// assert_eq!(again, 0); // idempotent
/// # }
/// ```

use leadgrid_shared::models::lead::Lead;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Default)]
struct BoardState {
    /// Leads in arrival order (pages arrive newest-first)
    rows: Vec<Lead>,

    /// Identities present in `rows`
    seen: HashSet<Uuid>,
}

/// Shared displayed collection, merged into by fetch generations
#[derive(Debug, Default)]
pub struct LeadBoard {
    state: RwLock<BoardState>,
}

impl LeadBoard {
    pub fn new() -> Self {
        LeadBoard::default()
    }

    /// Merges a batch, skipping identities already displayed
    ///
    /// Returns the number of leads actually added. Batches from a
    /// cancelled generation are discarded whole.
    pub async fn merge(&self, generation: &CancellationToken, leads: Vec<Lead>) -> usize {
        let mut state = self.state.write().await;
        if generation.is_cancelled() {
            tracing::debug!(batch = leads.len(), "discarding batch from superseded fetch");
            return 0;
        }
        Self::insert_new(&mut state, leads)
    }

    /// Replaces the displayed set with a fresh generation's first page
    ///
    /// Clearing and inserting happen under one write lock, so a racing
    /// stale replace cannot wipe a newer generation's rows.
    pub async fn replace(&self, generation: &CancellationToken, leads: Vec<Lead>) -> usize {
        let mut state = self.state.write().await;
        if generation.is_cancelled() {
            tracing::debug!(batch = leads.len(), "discarding replacement from superseded fetch");
            return 0;
        }
        state.rows.clear();
        state.seen.clear();
        Self::insert_new(&mut state, leads)
    }

    fn insert_new(state: &mut BoardState, leads: Vec<Lead>) -> usize {
        let mut added = 0;
        for lead in leads {
            if state.seen.insert(lead.id) {
                state.rows.push(lead);
                added += 1;
            }
        }
        added
    }

    /// Copy of the displayed leads in display order
    pub async fn snapshot(&self) -> Vec<Lead> {
        self.state.read().await.rows.clone()
    }

    /// Number of displayed leads
    pub async fn len(&self) -> usize {
        self.state.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.rows.is_empty()
    }

    /// Whether a lead identity is currently displayed
    pub async fn contains(&self, id: Uuid) -> bool {
        self.state.read().await.seen.contains(&id)
    }
}
