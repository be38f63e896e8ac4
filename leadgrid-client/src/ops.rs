/// Bulk mutation operations
///
/// Status changes, agent assignment, and deletion over a selected set of
/// lead identities. Every operation follows the same shape: gate on the
/// viewer's role, validate the request, issue one mutation against the
/// store keyed by the identity set, then fan out one audit entry per
/// affected lead.
///
/// # Gates
///
/// | Operation     | Allowed roles         |
/// |---------------|-----------------------|
/// | status change | admin, desk, manager  |
/// | assignment    | admin, desk           |
/// | deletion      | admin                 |
///
/// # Audit Fan-Out
///
/// Audit writes are not transactional with the mutation. A failed append
/// is logged and skipped; the remaining entries are still written and the
/// operation reports success. A failed store mutation aborts before any
/// audit write and leaves the displayed state untouched.
///
/// # Example
///
/// ```no_run
/// use leadgrid_client::ops::{BulkOps, DeletionRequest};
/// use leadgrid_client::session::ViewerContext;
/// use leadgrid_client::store::rest::RestStore;
/// use leadgrid_shared::models::viewer::{Role, SubordinateSet, Viewer};
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(RestStore::new("https://records.example.com/rest/v1", "key", "token"));
/// let ops = BulkOps::new(store);
/// let context = ViewerContext::new(
///     Viewer { id: Uuid::new_v4(), display_name: "Root".to_string(), role: Role::Admin },
///     SubordinateSet::empty(),
/// );
///
/// let outcome = ops
///     .delete(&context, DeletionRequest { lead_ids: vec![Uuid::new_v4()] })
///     .await?;
/// println!("deleted {} leads", outcome.affected);
/// # Ok(())
/// # }
/// ```

use crate::session::ViewerContext;
use crate::store::{AuditSink, RecordStore, StoreError};
use futures::future::join_all;
use leadgrid_shared::models::audit::{AuditEntry, AuditKind};
use leadgrid_shared::models::lead::LeadMutation;
use leadgrid_shared::models::status::StatusCatalog;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Bulk operation errors
#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    /// The viewer's role does not permit the operation
    #[error("role {role} may not {action}")]
    Forbidden {
        role: &'static str,
        action: &'static str,
    },

    /// The request payload failed validation
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    /// The target status is not in the fetched catalog
    #[error("unknown status label: {0}")]
    UnknownStatus(String),

    /// The store rejected or failed the mutation; nothing was audited
    #[error("store mutation failed: {0}")]
    Store(#[from] StoreError),
}

/// Bulk status change payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatusChangeRequest {
    /// Selected lead identities
    #[validate(length(min = 1))]
    pub lead_ids: Vec<Uuid>,

    /// Target status label, must name a cataloged status
    #[validate(length(min = 1, max = 64))]
    pub status: String,
}

/// Bulk assignment payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignmentRequest {
    /// Selected lead identities
    #[validate(length(min = 1))]
    pub lead_ids: Vec<Uuid>,

    /// Agent to assign, or `None` to clear the assignment
    pub assignee: Option<Uuid>,
}

/// Bulk deletion payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeletionRequest {
    /// Selected lead identities
    #[validate(length(min = 1))]
    pub lead_ids: Vec<Uuid>,
}

/// What a bulk operation accomplished
///
/// `audit_recorded` may trail `affected` when appends failed; that gap is
/// logged, never surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Leads the mutation was issued for
    pub affected: usize,

    /// Audit entries actually written
    pub audit_recorded: usize,
}

/// Bulk mutations against the hosted store
pub struct BulkOps<S: RecordStore + AuditSink> {
    store: Arc<S>,
}

impl<S: RecordStore + AuditSink> BulkOps<S> {
    pub fn new(store: Arc<S>) -> Self {
        BulkOps { store }
    }

    /// Changes the status of every selected lead
    pub async fn change_status(
        &self,
        context: &ViewerContext,
        request: StatusChangeRequest,
        catalog: &StatusCatalog,
    ) -> Result<BulkOutcome, OpsError> {
        if !context.viewer.role.can_change_status() {
            return Err(OpsError::Forbidden {
                role: context.viewer.role.as_str(),
                action: "change lead statuses",
            });
        }
        request.validate()?;
        if !catalog.contains_name(&request.status) {
            return Err(OpsError::UnknownStatus(request.status));
        }

        let mutation = LeadMutation::SetStatus(request.status);
        self.store.update_leads(&request.lead_ids, &mutation).await?;

        let audit_recorded = self
            .record_audit(&request.lead_ids, mutation.audit_kind(), &mutation.describe())
            .await;

        Ok(BulkOutcome {
            affected: request.lead_ids.len(),
            audit_recorded,
        })
    }

    /// Assigns every selected lead to an agent, or clears the assignment
    pub async fn assign(
        &self,
        context: &ViewerContext,
        request: AssignmentRequest,
    ) -> Result<BulkOutcome, OpsError> {
        if !context.viewer.role.can_assign_leads() {
            return Err(OpsError::Forbidden {
                role: context.viewer.role.as_str(),
                action: "assign leads",
            });
        }
        request.validate()?;

        let mutation = LeadMutation::Assign(request.assignee);
        self.store.update_leads(&request.lead_ids, &mutation).await?;

        let audit_recorded = self
            .record_audit(&request.lead_ids, mutation.audit_kind(), &mutation.describe())
            .await;

        Ok(BulkOutcome {
            affected: request.lead_ids.len(),
            audit_recorded,
        })
    }

    /// Deletes every selected lead
    pub async fn delete(
        &self,
        context: &ViewerContext,
        request: DeletionRequest,
    ) -> Result<BulkOutcome, OpsError> {
        if !context.viewer.role.can_bulk_delete() {
            return Err(OpsError::Forbidden {
                role: context.viewer.role.as_str(),
                action: "delete leads",
            });
        }
        request.validate()?;

        self.store.delete_leads(&request.lead_ids).await?;

        let audit_recorded = self
            .record_audit(&request.lead_ids, AuditKind::Deletion, "lead deleted")
            .await;

        Ok(BulkOutcome {
            affected: request.lead_ids.len(),
            audit_recorded,
        })
    }

    /// Appends one audit entry per lead, skipping failures
    async fn record_audit(&self, lead_ids: &[Uuid], kind: AuditKind, description: &str) -> usize {
        let appends = lead_ids.iter().map(|lead_id| {
            let entry = AuditEntry::new(*lead_id, kind, description);
            async move { (entry.lead_id, self.store.append(&entry).await) }
        });

        let mut recorded = 0;
        for (lead_id, result) in join_all(appends).await {
            match result {
                Ok(()) => recorded += 1,
                Err(error) => {
                    tracing::warn!(%lead_id, %error, "audit append failed, continuing");
                }
            }
        }
        recorded
    }
}
