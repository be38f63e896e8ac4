/// Store collaborator traits and types
///
/// This module defines the contracts for the external services the client
/// talks to:
///
/// - `RecordStore`: the hosted lead table, queried with range-based
///   pagination and mutated by identity set
/// - `HierarchyService`: the organizational hierarchy query backing the
///   subordinate set
/// - `AuditSink`: the append-only audit log
///
/// The production implementation for all three is [`rest::RestStore`];
/// [`memory::MemoryStore`] provides a deterministic in-memory counterpart
/// for tests and local development.
///
/// # Pagination Contract
///
/// Lead pages are requested as inclusive ranges (`offset` through
/// `offset + limit - 1`), ordered by creation time descending, with
/// converted leads filtered out on the server:
///
/// ```text
/// page 0: range 0-999
/// page 1: range 1000-1999
/// page 2: range 2000-2999
/// ```
///
/// A response shorter than the requested limit means the data is
/// exhausted.

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use leadgrid_shared::models::audit::AuditEntry;
use leadgrid_shared::models::lead::{Lead, LeadMutation};
use leadgrid_shared::models::status::StatusCatalog;
use leadgrid_shared::models::viewer::SubordinateSet;
use thiserror::Error;
use uuid::Uuid;

/// Store interaction errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connection, TLS, timeout)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store rejected the request
    #[error("store returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One bounded slice of the lead table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based offset of the first record
    pub offset: usize,

    /// Maximum records to return
    pub limit: usize,
}

impl PageRequest {
    /// Request for the given page index at a fixed page size
    pub fn page(index: usize, size: usize) -> Self {
        PageRequest {
            offset: index * size,
            limit: size,
        }
    }

    /// Inclusive end of the requested range
    pub fn range_end(&self) -> usize {
        self.offset + self.limit - 1
    }
}

/// The hosted lead table
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetches one page of not-yet-converted leads, newest first
    async fn fetch_leads_page(&self, page: PageRequest) -> Result<Vec<Lead>, StoreError>;

    /// Fetches the status catalog
    async fn fetch_statuses(&self) -> Result<StatusCatalog, StoreError>;

    /// Applies a mutation to every lead in the identity set
    async fn update_leads(&self, ids: &[Uuid], mutation: &LeadMutation) -> Result<(), StoreError>;

    /// Deletes every lead in the identity set
    async fn delete_leads(&self, ids: &[Uuid]) -> Result<(), StoreError>;
}

/// The organizational hierarchy query
#[async_trait]
pub trait HierarchyService: Send + Sync {
    /// Returns the user ids subordinate to the given viewer
    async fn subordinates_of(&self, viewer_id: Uuid) -> Result<SubordinateSet, StoreError>;
}

/// The append-only audit log
///
/// Entries are fire-and-forget from the caller's perspective: a failed
/// append is the caller's to log, never to retry or surface.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Appends one audit entry
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError>;
}
