/// Integration tests for the visibility predicate
///
/// These tests exercise the documented visibility scenarios end to end
/// through the public API of the shared crate.

use chrono::Utc;
use leadgrid_shared::models::lead::Lead;
use leadgrid_shared::models::viewer::{Role, SubordinateSet, Viewer};
use leadgrid_shared::visibility::{filter_visible, visible};
use uuid::Uuid;

fn lead_assigned_to(agent: Option<Uuid>) -> Lead {
    Lead {
        id: Uuid::new_v4(),
        first_name: "Test".to_string(),
        last_name: "Lead".to_string(),
        email: None,
        phone: None,
        status: "new".to_string(),
        assigned_to: agent,
        desk: None,
        is_converted: false,
        created_at: Utc::now(),
    }
}

#[test]
fn admin_sees_every_lead_regardless_of_subordinates() {
    let admin = Viewer {
        id: Uuid::new_v4(),
        display_name: "Root".to_string(),
        role: Role::Admin,
    };

    let leads = vec![
        lead_assigned_to(None),
        lead_assigned_to(Some(Uuid::new_v4())),
        lead_assigned_to(Some(admin.id)),
    ];

    for lead in &leads {
        assert!(visible(lead, &admin, &SubordinateSet::empty()));
        let subs: SubordinateSet = [Uuid::new_v4()].into_iter().collect();
        assert!(visible(lead, &admin, &subs));
    }
}

#[test]
fn agent_visibility_is_exactly_own_assignment() {
    let agent = Viewer {
        id: Uuid::new_v4(),
        display_name: "Grace".to_string(),
        role: Role::Agent,
    };

    let leads = vec![
        lead_assigned_to(Some(agent.id)),
        lead_assigned_to(Some(Uuid::new_v4())),
        lead_assigned_to(None),
    ];

    for lead in &leads {
        let expected = lead.assigned_to == Some(agent.id);
        assert_eq!(visible(lead, &agent, &SubordinateSet::empty()), expected);
    }
}

/// Manager with subordinates {u2, u3} and id u1; leads assigned to
/// {u1, u2, u4} must narrow to the u1 and u2 leads only.
#[test]
fn manager_scenario_narrows_to_own_and_subordinate_leads() {
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();
    let u3 = Uuid::new_v4();
    let u4 = Uuid::new_v4();

    let manager = Viewer {
        id: u1,
        display_name: "Marta".to_string(),
        role: Role::Manager,
    };
    let subs: SubordinateSet = [u2, u3].into_iter().collect();

    let own = lead_assigned_to(Some(u1));
    let subordinate = lead_assigned_to(Some(u2));
    let unrelated = lead_assigned_to(Some(u4));

    let filtered = filter_visible(
        vec![own.clone(), subordinate.clone(), unrelated],
        &manager,
        &subs,
    );

    assert_eq!(filtered, vec![own, subordinate]);
}

#[test]
fn desk_label_admits_unassigned_leads_for_desk_heads() {
    let desk = Viewer {
        id: Uuid::new_v4(),
        display_name: "EU Desk".to_string(),
        role: Role::Desk,
    };

    let mut owned = lead_assigned_to(None);
    owned.desk = Some("EU Desk".to_string());

    let mut foreign = lead_assigned_to(None);
    foreign.desk = Some("US Desk".to_string());

    assert!(visible(&owned, &desk, &SubordinateSet::empty()));
    assert!(!visible(&foreign, &desk, &SubordinateSet::empty()));
}

#[test]
fn unrecognized_role_denies_instead_of_falling_through() {
    let viewer = Viewer {
        id: Uuid::new_v4(),
        display_name: "Ghost".to_string(),
        role: Role::parse("compliance"),
    };

    let batch = vec![
        lead_assigned_to(Some(viewer.id)),
        lead_assigned_to(None),
    ];

    assert!(filter_visible(batch, &viewer, &SubordinateSet::empty()).is_empty());
}
