/// Lead model and mutation types
///
/// This module provides the Lead record as served by the hosted store's
/// `leads` table, plus the in-place mutations the store accepts for a set
/// of lead identities.
///
/// # Store Columns
///
/// ```text
/// leads:
///     id            UUID PRIMARY KEY
///     first_name    TEXT NOT NULL
///     last_name     TEXT NOT NULL
///     email         TEXT
///     phone         TEXT
///     status        TEXT NOT NULL        -- label from the status catalog
///     assigned_to   UUID                 -- agent user id, nullable
///     desk          TEXT                 -- owning desk/team label
///     is_converted  BOOLEAN NOT NULL
///     created_at    TIMESTAMPTZ NOT NULL
/// ```
///
/// Leads are mutable in place by authorized viewers and are never deleted
/// except by an explicit bulk deletion.
///
/// # Example
///
/// ```
/// use leadgrid_shared::models::lead::{Lead, LeadMutation};
/// use uuid::Uuid;
///
/// let mutation = LeadMutation::Assign(Some(Uuid::new_v4()));
/// let body = mutation.patch_body();
/// assert!(body.get("assigned_to").is_some());
/// ```

use crate::models::audit::AuditKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

/// A prospective customer record tracked through the sales pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Unique lead ID
    pub id: Uuid,

    /// First name
    pub first_name: String,

    /// Last name
    pub last_name: String,

    /// Contact email, if captured
    pub email: Option<String>,

    /// Contact phone, if captured
    pub phone: Option<String>,

    /// Current status label, drawn from the separately fetched catalog
    pub status: String,

    /// Agent the lead is assigned to (null when unassigned)
    pub assigned_to: Option<Uuid>,

    /// Owning desk/team label (null when not desk-owned)
    pub desk: Option<String>,

    /// Whether the lead has been converted out of the pipeline
    pub is_converted: bool,

    /// When the lead was created
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Display name for logs and audit descriptions
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Checks whether the lead is assigned to the given user
    pub fn assigned_to_user(&self, user_id: Uuid) -> bool {
        self.assigned_to == Some(user_id)
    }
}

/// In-place mutation applied to a set of lead identities
///
/// The store accepts exactly two bulk patches: a status change and an
/// assignment change (where `None` clears the assignment). Deletion is a
/// separate operation keyed by the same identity set.
#[derive(Debug, Clone, PartialEq)]
pub enum LeadMutation {
    /// Replace the status label on every selected lead
    SetStatus(String),

    /// Replace the assigned agent on every selected lead
    Assign(Option<Uuid>),
}

impl LeadMutation {
    /// JSON patch body the store expects for this mutation
    pub fn patch_body(&self) -> JsonValue {
        match self {
            LeadMutation::SetStatus(status) => json!({ "status": status }),
            LeadMutation::Assign(Some(agent)) => json!({ "assigned_to": agent }),
            LeadMutation::Assign(None) => json!({ "assigned_to": JsonValue::Null }),
        }
    }

    /// Audit kind recorded for this mutation
    pub fn audit_kind(&self) -> AuditKind {
        match self {
            LeadMutation::SetStatus(_) => AuditKind::StatusChange,
            LeadMutation::Assign(_) => AuditKind::Assignment,
        }
    }

    /// Human-readable description for audit entries
    pub fn describe(&self) -> String {
        match self {
            LeadMutation::SetStatus(status) => format!("status changed to {}", status),
            LeadMutation::Assign(Some(agent)) => format!("assigned to {}", agent),
            LeadMutation::Assign(None) => "assignment cleared".to_string(),
        }
    }
}
