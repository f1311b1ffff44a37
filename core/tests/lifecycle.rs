//! Status lifecycle: the state machine and its role gates.

mod common;

use common::{caller, complaint, seeded_store};
use wastetrack_core::{
    error::TrackError,
    identity::Role,
    lifecycle::ComplaintDesk,
    status::ComplaintStatus,
};

/// Full walk: filed in department 2, employee 5 receives and resolves
/// it, cannot close it, the department manager can.
#[test]
fn resolve_then_close_walkthrough() {
    let desk = ComplaintDesk::new(seeded_store());
    let assignee = caller(5, Role::Employee, Some(2));
    let manager = caller(9, Role::Manager, Some(2));

    let id = desk.create_complaint(&complaint(2, Some(2))).unwrap();
    let filed = desk.store().get_complaint(id).unwrap();
    assert_eq!(filed.assigned_employee, Some(5));
    assert_eq!(filed.status, ComplaintStatus::InProgress);

    desk.update_status(id, ComplaintStatus::Resolved, Some(&assignee))
        .unwrap();

    let err = desk
        .update_status(id, ComplaintStatus::Closed, Some(&assignee))
        .unwrap_err();
    assert!(matches!(err, TrackError::InsufficientRole { .. }), "got {err}");

    desk.update_status(id, ComplaintStatus::Closed, Some(&manager))
        .unwrap();
    let closed = desk.store().get_complaint(id).unwrap();
    assert_eq!(closed.status, ComplaintStatus::Closed);
}

/// Resolving is for the assigned employee or a Manager; a colleague in
/// the same department is neither.
#[test]
fn only_assignee_or_manager_resolves() {
    let desk = ComplaintDesk::new(seeded_store());
    let id = desk.create_complaint(&complaint(1, None)).unwrap(); // -> employee 3

    let colleague = caller(4, Role::Employee, Some(1));
    let err = desk
        .update_status(id, ComplaintStatus::Resolved, Some(&colleague))
        .unwrap_err();
    assert!(matches!(err, TrackError::InsufficientRole { .. }), "got {err}");

    let manager = caller(1, Role::Manager, Some(1));
    desk.update_status(id, ComplaintStatus::Resolved, Some(&manager))
        .unwrap();
}

/// Repeating the current status is not a legal transition.
#[test]
fn self_transition_is_rejected() {
    let desk = ComplaintDesk::new(seeded_store());
    let id = desk.create_complaint(&complaint(1, None)).unwrap();

    let manager = caller(1, Role::Manager, Some(1));
    let err = desk
        .update_status(id, ComplaintStatus::InProgress, Some(&manager))
        .unwrap_err();
    assert!(
        matches!(
            err,
            TrackError::InvalidTransition {
                from: ComplaintStatus::InProgress,
                to: ComplaintStatus::InProgress,
            }
        ),
        "got {err}"
    );
}

/// Nothing transitions into `Open`, and nothing leaves `Closed`.
#[test]
fn open_unreachable_and_closed_terminal() {
    let desk = ComplaintDesk::new(seeded_store());
    let manager = caller(1, Role::Manager, Some(1));
    let id = desk.create_complaint(&complaint(1, None)).unwrap();

    let err = desk
        .update_status(id, ComplaintStatus::Open, Some(&manager))
        .unwrap_err();
    assert!(matches!(err, TrackError::InvalidTransition { .. }), "got {err}");

    desk.update_status(id, ComplaintStatus::Resolved, Some(&manager))
        .unwrap();
    desk.update_status(id, ComplaintStatus::Closed, Some(&manager))
        .unwrap();

    for target in [ComplaintStatus::Resolved, ComplaintStatus::InProgress] {
        let err = desk.update_status(id, target, Some(&manager)).unwrap_err();
        assert!(matches!(err, TrackError::InvalidTransition { .. }), "got {err}");
    }
}

/// Skipping `Resolved` is not allowed even for a Manager.
#[test]
fn cannot_close_unresolved_complaint() {
    let desk = ComplaintDesk::new(seeded_store());
    let manager = caller(1, Role::Manager, Some(1));
    let id = desk.create_complaint(&complaint(1, None)).unwrap();

    let err = desk
        .update_status(id, ComplaintStatus::Closed, Some(&manager))
        .unwrap_err();
    assert!(matches!(err, TrackError::InvalidTransition { .. }), "got {err}");
}

#[test]
fn unknown_complaint_is_not_found() {
    let desk = ComplaintDesk::new(seeded_store());
    let manager = caller(1, Role::Manager, Some(1));

    let err = desk
        .update_status(9999, ComplaintStatus::Resolved, Some(&manager))
        .unwrap_err();
    assert!(matches!(err, TrackError::NotFound { what: "complaint", .. }), "got {err}");
}

#[test]
fn anonymous_callers_cannot_update_status() {
    let desk = ComplaintDesk::new(seeded_store());
    let id = desk.create_complaint(&complaint(1, None)).unwrap();

    let err = desk
        .update_status(id, ComplaintStatus::Resolved, None)
        .unwrap_err();
    assert!(matches!(err, TrackError::NotAuthenticated), "got {err}");

    // An anonymous close attempt is a missing login, not a missing role.
    let err = desk
        .update_status(id, ComplaintStatus::Closed, None)
        .unwrap_err();
    assert!(matches!(err, TrackError::NotAuthenticated), "got {err}");
}
