/// Lead visibility predicate
///
/// This module decides which leads a viewer may see. The predicate is a
/// pure function of the lead, the viewer, and the viewer's subordinate
/// set; it has no side effects and is safe to apply independently to any
/// batch of leads, in any order, any number of times.
///
/// # Visibility Model
///
/// | Role    | Sees a lead when                                              |
/// |---------|---------------------------------------------------------------|
/// | admin   | always                                                        |
/// | desk    | lead.desk matches the viewer's display name, or the lead is   |
/// |         | assigned to the viewer or one of their subordinates           |
/// | manager | the lead is assigned to the viewer or one of their            |
/// |         | subordinates                                                  |
/// | agent   | the lead is assigned to the viewer                            |
/// | unknown | never                                                         |
///
/// An unrecognized role denies everything. Leads with `is_converted` set
/// never reach this predicate in normal operation (the store query filters
/// them out), but the predicate itself is agnostic to conversion state.
///
/// # Example
///
/// ```
/// use leadgrid_shared::models::viewer::{Role, SubordinateSet, Viewer};
/// use leadgrid_shared::visibility::visible;
/// # use leadgrid_shared::models::lead::Lead;
/// # use chrono::Utc;
/// # use uuid::Uuid;
/// # fn lead_assigned_to(agent: Option<Uuid>) -> Lead {
/// #     Lead {
/// #         id: Uuid::new_v4(),
/// #         first_name: "Ada".to_string(),
/// #         last_name: "Byron".to_string(),
/// #         email: None,
/// #         phone: None,
/// #         status: "new".to_string(),
/// #         assigned_to: agent,
/// #         desk: None,
/// #         is_converted: false,
/// #         created_at: Utc::now(),
/// #     }
/// # }
///
/// let agent = Viewer {
///     id: Uuid::new_v4(),
///     display_name: "Grace".to_string(),
///     role: Role::Agent,
/// };
///
/// let mine = lead_assigned_to(Some(agent.id));
/// let theirs = lead_assigned_to(Some(Uuid::new_v4()));
///
/// assert!(visible(&mine, &agent, &SubordinateSet::empty()));
/// assert!(!visible(&theirs, &agent, &SubordinateSet::empty()));
/// ```

use crate::models::lead::Lead;
use crate::models::viewer::{Role, SubordinateSet, Viewer};

/// Decides whether the viewer may see the given lead
pub fn visible(lead: &Lead, viewer: &Viewer, subordinates: &SubordinateSet) -> bool {
    match viewer.role {
        Role::Admin => true,
        Role::Desk => {
            lead.desk.as_deref() == Some(viewer.display_name.as_str())
                || assigned_to_viewer_or_subordinate(lead, viewer, subordinates)
        }
        Role::Manager => assigned_to_viewer_or_subordinate(lead, viewer, subordinates),
        Role::Agent => lead.assigned_to_user(viewer.id),
        Role::Unknown => false,
    }
}

/// Narrows a batch of leads to those the viewer may see
///
/// Order is preserved; the input typically arrives newest-first from the
/// store and stays that way.
pub fn filter_visible(leads: Vec<Lead>, viewer: &Viewer, subordinates: &SubordinateSet) -> Vec<Lead> {
    leads
        .into_iter()
        .filter(|lead| visible(lead, viewer, subordinates))
        .collect()
}

fn assigned_to_viewer_or_subordinate(
    lead: &Lead,
    viewer: &Viewer,
    subordinates: &SubordinateSet,
) -> bool {
    match lead.assigned_to {
        Some(agent) => agent == viewer.id || subordinates.contains(agent),
        None => false,
    }
}
