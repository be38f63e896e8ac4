/// Change-feed listener
///
/// The hosted backend notifies clients when lead rows are inserted or
/// updated. Notifications carry no diff worth applying; they are purely a
/// trigger to re-run the paginated fetch. The subscription transport is
/// external to this crate: whatever speaks the wire protocol pushes
/// [`LeadChange`] values into the channel created by [`feed_channel`],
/// and [`ChangeListener`] turns each one into a `refresh`.
///
/// A failing refetch is logged and the last known board is kept; the
/// listener stays alive for the next notification. Dropping the sender
/// ends the loop, as does cancelling the shutdown token.

use crate::fetcher::LeadFetcher;
use crate::store::RecordStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// One change notification from the record table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadChange {
    /// A lead row was inserted
    Inserted(Uuid),

    /// A lead row was updated
    Updated(Uuid),
}

impl LeadChange {
    /// The lead the notification is about
    pub fn lead_id(&self) -> Uuid {
        match self {
            LeadChange::Inserted(id) | LeadChange::Updated(id) => *id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadChange::Inserted(_) => "inserted",
            LeadChange::Updated(_) => "updated",
        }
    }
}

/// Creates the channel the realtime transport feeds
pub fn feed_channel(capacity: usize) -> (mpsc::Sender<LeadChange>, mpsc::Receiver<LeadChange>) {
    mpsc::channel(capacity)
}

/// Turns change notifications into refetches
pub struct ChangeListener<S: RecordStore + 'static> {
    changes: mpsc::Receiver<LeadChange>,
    fetcher: Arc<LeadFetcher<S>>,
    shutdown: CancellationToken,
}

impl<S: RecordStore + 'static> ChangeListener<S> {
    pub fn new(
        changes: mpsc::Receiver<LeadChange>,
        fetcher: Arc<LeadFetcher<S>>,
        shutdown: CancellationToken,
    ) -> Self {
        ChangeListener {
            changes,
            fetcher,
            shutdown,
        }
    }

    /// Consumes notifications until shutdown or sender drop
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("change listener shutting down");
                    return;
                }
                change = self.changes.recv() => {
                    let Some(change) = change else {
                        tracing::debug!("change feed closed, listener stopping");
                        return;
                    };

                    tracing::debug!(
                        lead = %change.lead_id(),
                        kind = change.as_str(),
                        "change notification, refetching"
                    );
                    if let Err(error) = self.fetcher.refresh().await {
                        tracing::warn!(%error, "refetch after change failed, keeping last known leads");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::LeadBoard;
    use crate::session::ViewerContext;
    use crate::store::memory::MemoryStore;
    use chrono::Utc;
    use leadgrid_shared::models::lead::Lead;
    use leadgrid_shared::models::viewer::{Role, SubordinateSet, Viewer};
    use tokio::time::{sleep, Duration};

    fn lead() -> Lead {
        Lead {
            id: Uuid::new_v4(),
            first_name: "Test".to_string(),
            last_name: "Lead".to_string(),
            email: None,
            phone: None,
            status: "new".to_string(),
            assigned_to: None,
            desk: None,
            is_converted: false,
            created_at: Utc::now(),
        }
    }

    fn admin_context() -> ViewerContext {
        ViewerContext::new(
            Viewer {
                id: Uuid::new_v4(),
                display_name: "Root".to_string(),
                role: Role::Admin,
            },
            SubordinateSet::empty(),
        )
    }

    async fn wait_for_len(board: &Arc<LeadBoard>, expected: usize) {
        for _ in 0..200 {
            if board.len().await == expected {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("board never reached {} leads", expected);
    }

    #[tokio::test]
    async fn test_change_notification_triggers_refetch() {
        let store = Arc::new(MemoryStore::new());
        let board = Arc::new(LeadBoard::new());
        let fetcher = Arc::new(LeadFetcher::new(
            Arc::clone(&store),
            Arc::clone(&board),
            admin_context(),
        ));

        let shutdown = CancellationToken::new();
        let (tx, rx) = feed_channel(16);
        tokio::spawn(ChangeListener::new(rx, fetcher, shutdown.clone()).run());

        let first = lead();
        store.seed_leads(vec![first.clone()]).await;
        tx.send(LeadChange::Inserted(first.id)).await.unwrap();
        wait_for_len(&board, 1).await;

        let second = lead();
        store.seed_leads(vec![second.clone()]).await;
        tx.send(LeadChange::Updated(second.id)).await.unwrap();
        wait_for_len(&board, 2).await;

        shutdown.cancel();
    }

    #[tokio::test]
    async fn test_listener_survives_failed_refetch() {
        let store = Arc::new(MemoryStore::new());
        let board = Arc::new(LeadBoard::new());
        let fetcher = Arc::new(LeadFetcher::new(
            Arc::clone(&store),
            Arc::clone(&board),
            admin_context(),
        ));

        let seeded = lead();
        store.seed_leads(vec![seeded.clone()]).await;
        fetcher.refresh().await.unwrap();

        let shutdown = CancellationToken::new();
        let (tx, rx) = feed_channel(16);
        tokio::spawn(ChangeListener::new(rx, fetcher, shutdown.clone()).run());

        // Refetch fails; the board keeps its last known row
        store.fail_fetch_from_page(0).await;
        tx.send(LeadChange::Updated(seeded.id)).await.unwrap();
        sleep(Duration::from_millis(30)).await;
        assert_eq!(board.len().await, 1);

        // The listener is still consuming notifications
        tx.send(LeadChange::Inserted(Uuid::new_v4())).await.unwrap();
        sleep(Duration::from_millis(30)).await;
        assert_eq!(board.len().await, 1);

        shutdown.cancel();
    }
}
