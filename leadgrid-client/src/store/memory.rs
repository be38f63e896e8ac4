/// In-memory store for tests and local development
///
/// This store implements every collaborator trait against plain vectors,
/// with the same observable contract as the REST client: pages are sliced
/// newest-first from the non-converted rows, mutations are keyed by
/// identity set, and audit entries append to a growing log.
///
/// # Fault Injection
///
/// - `fail_fetch_from_page(n)`: every page request with index >= n fails
/// - `fail_audit_append(n)`: the nth append (1-based) fails
///
/// Failures surface as `StoreError::Rejected` with status 500, matching
/// what callers see from a misbehaving backend.
///
/// # Example
///
/// ```
/// use leadgrid_client::store::memory::MemoryStore;
/// use leadgrid_client::store::{PageRequest, RecordStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let page = store.fetch_leads_page(PageRequest::page(0, 1000)).await?;
/// assert!(page.is_empty());
/// # Ok(())
/// # }
/// ```

use crate::store::{AuditSink, HierarchyService, PageRequest, RecordStore, StoreError};
use async_trait::async_trait;
use leadgrid_shared::models::audit::AuditEntry;
use leadgrid_shared::models::lead::{Lead, LeadMutation};
use leadgrid_shared::models::status::{LeadStatus, StatusCatalog};
use leadgrid_shared::models::viewer::SubordinateSet;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    leads: Vec<Lead>,
    statuses: Vec<LeadStatus>,
    subordinates: HashMap<Uuid, SubordinateSet>,
    audit: Vec<AuditEntry>,

    page_requests: usize,
    audit_attempts: usize,
    fail_fetch_from_page: Option<usize>,
    fail_audit_on: HashSet<usize>,
    fail_next_mutation: bool,
}

/// Deterministic in-memory implementation of all store collaborators
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn injected_failure() -> StoreError {
        StoreError::Rejected {
            status: 500,
            message: "injected failure".to_string(),
        }
    }

    /// Seeds lead rows (converted rows are kept but never served)
    pub async fn seed_leads(&self, leads: Vec<Lead>) {
        self.state.lock().await.leads.extend(leads);
    }

    /// Replaces the status catalog
    pub async fn set_statuses(&self, statuses: Vec<LeadStatus>) {
        self.state.lock().await.statuses = statuses;
    }

    /// Registers the subordinate set returned for a viewer
    pub async fn set_subordinates(&self, viewer_id: Uuid, subordinates: SubordinateSet) {
        self.state
            .lock()
            .await
            .subordinates
            .insert(viewer_id, subordinates);
    }

    /// Fails every page request with index >= `page_index`
    pub async fn fail_fetch_from_page(&self, page_index: usize) {
        self.state.lock().await.fail_fetch_from_page = Some(page_index);
    }

    /// Fails the nth audit append (1-based)
    pub async fn fail_audit_append(&self, nth: usize) {
        self.state.lock().await.fail_audit_on.insert(nth);
    }

    /// Fails the next update or delete, then recovers
    pub async fn fail_next_mutation(&self) {
        self.state.lock().await.fail_next_mutation = true;
    }

    /// Number of page requests served or rejected so far
    pub async fn page_request_count(&self) -> usize {
        self.state.lock().await.page_requests
    }

    /// Recorded audit entries, in append order
    pub async fn audit_entries(&self) -> Vec<AuditEntry> {
        self.state.lock().await.audit.clone()
    }

    /// Current lead rows, including converted ones
    pub async fn leads_snapshot(&self) -> Vec<Lead> {
        self.state.lock().await.leads.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn fetch_leads_page(&self, page: PageRequest) -> Result<Vec<Lead>, StoreError> {
        let mut state = self.state.lock().await;
        state.page_requests += 1;

        let page_index = if page.limit > 0 { page.offset / page.limit } else { 0 };
        if let Some(fail_from) = state.fail_fetch_from_page {
            if page_index >= fail_from {
                return Err(Self::injected_failure());
            }
        }

        let mut matching: Vec<Lead> = state
            .leads
            .iter()
            .filter(|lead| !lead.is_converted)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .collect())
    }

    async fn fetch_statuses(&self) -> Result<StatusCatalog, StoreError> {
        let state = self.state.lock().await;
        Ok(StatusCatalog::new(state.statuses.clone()))
    }

    async fn update_leads(&self, ids: &[Uuid], mutation: &LeadMutation) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.fail_next_mutation {
            state.fail_next_mutation = false;
            return Err(Self::injected_failure());
        }
        for lead in state.leads.iter_mut() {
            if !ids.contains(&lead.id) {
                continue;
            }
            match mutation {
                LeadMutation::SetStatus(status) => lead.status = status.clone(),
                LeadMutation::Assign(agent) => lead.assigned_to = *agent,
            }
        }
        Ok(())
    }

    async fn delete_leads(&self, ids: &[Uuid]) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.fail_next_mutation {
            state.fail_next_mutation = false;
            return Err(Self::injected_failure());
        }
        state.leads.retain(|lead| !ids.contains(&lead.id));
        Ok(())
    }
}

#[async_trait]
impl HierarchyService for MemoryStore {
    async fn subordinates_of(&self, viewer_id: Uuid) -> Result<SubordinateSet, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .subordinates
            .get(&viewer_id)
            .cloned()
            .unwrap_or_else(SubordinateSet::empty))
    }
}

#[async_trait]
impl AuditSink for MemoryStore {
    async fn append(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.audit_attempts += 1;
        if state.fail_audit_on.contains(&state.audit_attempts) {
            return Err(Self::injected_failure());
        }
        state.audit.push(entry.clone());
        Ok(())
    }
}
