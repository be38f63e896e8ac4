/// Audit entry model
///
/// Every bulk mutation appends one audit entry per affected lead to the
/// store's append-only audit log. Entries are write-only from this side;
/// there is no read path in the client.
///
/// # Store Columns
///
/// ```text
/// audit_log:
///     lead_id      UUID NOT NULL
///     type         TEXT NOT NULL        -- status_change | assignment | deletion
///     description  TEXT NOT NULL
/// ```
///
/// # Example
///
/// ```
/// use leadgrid_shared::models::audit::{AuditEntry, AuditKind};
/// use uuid::Uuid;
///
/// let entry = AuditEntry::deletion(Uuid::new_v4(), "Ada Byron");
/// assert_eq!(entry.kind, AuditKind::Deletion);
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of mutation an audit entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// Lead status was changed
    StatusChange,

    /// Lead was assigned or unassigned
    Assignment,

    /// Lead was deleted
    Deletion,
}

impl AuditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditKind::StatusChange => "status_change",
            AuditKind::Assignment => "assignment",
            AuditKind::Deletion => "deletion",
        }
    }
}

/// Append-only record of one mutation on one lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Affected lead
    pub lead_id: Uuid,

    /// Mutation kind, serialized as the store's `type` column
    #[serde(rename = "type")]
    pub kind: AuditKind,

    /// Human-readable description of the mutation
    pub description: String,
}

impl AuditEntry {
    /// Entry for a mutation described by the caller
    pub fn new(lead_id: Uuid, kind: AuditKind, description: impl Into<String>) -> Self {
        AuditEntry {
            lead_id,
            kind,
            description: description.into(),
        }
    }

    /// Entry recording a lead deletion
    pub fn deletion(lead_id: Uuid, lead_name: &str) -> Self {
        AuditEntry::new(lead_id, AuditKind::Deletion, format!("{} deleted", lead_name))
    }
}
