/// Lead status catalog
///
/// Statuses are not hard-coded: the store serves a small catalog from its
/// own table, and bulk status changes must name a cataloged label.
///
/// # Store Columns
///
/// ```text
/// lead_statuses:
///     id    BIGINT PRIMARY KEY
///     name  TEXT NOT NULL UNIQUE
/// ```

use serde::{Deserialize, Serialize};

/// One row of the status catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStatus {
    /// Stable status ID
    pub id: i64,

    /// Status label as shown on leads
    pub name: String,
}

/// The fetched set of valid status labels, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusCatalog {
    statuses: Vec<LeadStatus>,
}

impl StatusCatalog {
    pub fn new(statuses: Vec<LeadStatus>) -> Self {
        StatusCatalog { statuses }
    }

    /// Whether the given label names a cataloged status
    pub fn contains_name(&self, name: &str) -> bool {
        self.statuses.iter().any(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Catalog rows in store order
    pub fn statuses(&self) -> &[LeadStatus] {
        &self.statuses
    }
}
