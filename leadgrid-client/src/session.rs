/// Per-session viewer context
///
/// The viewer identity and role arrive from the external auth service; the
/// subordinate set comes from the hierarchy query. Both are resolved once
/// when the session starts and then passed explicitly into every component
/// that filters or mutates leads. There is no ambient current-viewer
/// state anywhere in the client; an auth change means building a new
/// context and new components around it.
///
/// # Example
///
/// ```no_run
/// use leadgrid_client::session::ViewerContext;
/// use leadgrid_client::store::rest::RestStore;
/// use leadgrid_shared::models::viewer::{Role, Viewer};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = RestStore::new("https://records.example.com/rest/v1", "key", "token");
/// let viewer = Viewer {
///     id: Uuid::new_v4(),
///     display_name: "EU Desk".to_string(),
///     role: Role::Desk,
/// };
///
/// let context = ViewerContext::load(&store, viewer).await?;
/// println!("manages {} users", context.subordinates.len());
/// # Ok(())
/// # }
/// ```

use crate::store::{HierarchyService, StoreError};
use leadgrid_shared::models::viewer::{SubordinateSet, Viewer};
use thiserror::Error;

/// Session establishment errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// The hierarchy query failed
    #[error("hierarchy query failed: {0}")]
    Hierarchy(#[from] StoreError),
}

/// The viewer plus everything their visibility depends on
#[derive(Debug, Clone)]
pub struct ViewerContext {
    /// The authenticated actor
    pub viewer: Viewer,

    /// Users the viewer manages (empty unless the role needs them)
    pub subordinates: SubordinateSet,
}

impl ViewerContext {
    /// Builds a context from parts already at hand
    pub fn new(viewer: Viewer, subordinates: SubordinateSet) -> Self {
        ViewerContext {
            viewer,
            subordinates,
        }
    }

    /// Resolves the context for a freshly authenticated viewer
    ///
    /// The hierarchy service is queried only for roles whose visibility
    /// depends on subordinates; admins and agents skip the round trip.
    pub async fn load<H: HierarchyService>(
        hierarchy: &H,
        viewer: Viewer,
    ) -> Result<Self, SessionError> {
        let subordinates = if viewer.role.needs_subordinates() {
            hierarchy.subordinates_of(viewer.id).await?
        } else {
            SubordinateSet::empty()
        };

        tracing::debug!(
            viewer = %viewer.id,
            role = viewer.role.as_str(),
            subordinates = subordinates.len(),
            "viewer context resolved"
        );

        Ok(ViewerContext::new(viewer, subordinates))
    }
}
