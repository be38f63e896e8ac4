/// Viewer model and role-based permissions
///
/// This module provides the authenticated actor type and the role taxonomy
/// that drives both lead visibility and bulk-operation gating.
///
/// # Roles
///
/// - **admin**: sees every lead, may run every bulk operation
/// - **desk**: sees leads owned by their desk or assigned to them or their
///   subordinates; may change statuses and assign agents
/// - **manager**: sees leads assigned to them or their subordinates; may
///   change statuses
/// - **agent**: sees only leads assigned to them; read-only in bulk terms
///
/// Role labels arrive from the hosted auth service as free-form strings; a
/// label outside the taxonomy deserializes to `Role::Unknown`, which holds
/// no visibility and no bulk permissions.
///
/// # Example
///
/// ```
/// use leadgrid_shared::models::viewer::{Role, SubordinateSet, Viewer};
/// use uuid::Uuid;
///
/// let viewer = Viewer {
///     id: Uuid::new_v4(),
///     display_name: "EU Desk".to_string(),
///     role: Role::Desk,
/// };
///
/// assert!(viewer.role.can_assign_leads());
/// assert!(!viewer.role.can_bulk_delete());
/// ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Viewer roles, in descending order of reach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees and mutates everything
    Admin,

    /// Heads a desk: desk-owned leads plus own and subordinate assignments
    Desk,

    /// Manages agents: own and subordinate assignments
    Manager,

    /// Works own assignments only
    Agent,

    /// Unrecognized role label. Holds no visibility and no permissions.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Converts role to string for display and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Desk => "desk",
            Role::Manager => "manager",
            Role::Agent => "agent",
            Role::Unknown => "unknown",
        }
    }

    /// Parses a role label from the auth service
    ///
    /// Unrecognized labels map to `Role::Unknown` rather than erroring, so
    /// a viewer with a stale or misconfigured role resolves to an actor
    /// that sees nothing instead of one that sees everything.
    pub fn parse(label: &str) -> Role {
        match label {
            "admin" => Role::Admin,
            "desk" => Role::Desk,
            "manager" => Role::Manager,
            "agent" => Role::Agent,
            _ => Role::Unknown,
        }
    }

    /// Can delete leads in bulk
    pub fn can_bulk_delete(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Can change lead statuses in bulk
    pub fn can_change_status(&self) -> bool {
        matches!(self, Role::Admin | Role::Desk | Role::Manager)
    }

    /// Can assign or unassign agents in bulk
    pub fn can_assign_leads(&self) -> bool {
        matches!(self, Role::Admin | Role::Desk)
    }

    /// Whether visibility for this role depends on the subordinate set
    pub fn needs_subordinates(&self) -> bool {
        matches!(self, Role::Desk | Role::Manager)
    }
}

/// The authenticated actor performing reads and mutations
///
/// Identity and role are established by the external auth service; this
/// type is the explicit context handed to every component that filters or
/// mutates leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    /// User ID from the auth service
    pub id: Uuid,

    /// Display name; for desk heads this matches the `desk` label on leads
    pub display_name: String,

    /// Resolved role
    pub role: Role,
}

/// Set of user identifiers the viewer manages
///
/// Sourced from the external hierarchy query for desk and manager roles;
/// empty for everyone else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubordinateSet(HashSet<Uuid>);

impl SubordinateSet {
    /// An empty set, for roles with no subordinates
    pub fn empty() -> Self {
        SubordinateSet(HashSet::new())
    }

    /// Whether the given user is a subordinate of the viewer
    pub fn contains(&self, user_id: Uuid) -> bool {
        self.0.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Uuid> for SubordinateSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        SubordinateSet(iter.into_iter().collect())
    }
}
