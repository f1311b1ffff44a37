//! Intake: selection and insert are one transaction.

mod common;

use common::{complaint, seeded_store};
use wastetrack_core::{
    error::TrackError,
    lifecycle::{ComplaintDesk, NewComplaint},
    status::ComplaintStatus,
};

/// Department 1 has three idle eligible employees (3, 4, 7); the lowest
/// id wins the zero-load tie and the creation is logged exactly once.
#[test]
fn intake_assigns_least_loaded_and_logs_once() {
    let desk = ComplaintDesk::new(seeded_store());

    let id = desk.create_complaint(&complaint(1, Some(1))).unwrap();
    let filed = desk.store().get_complaint(id).unwrap();

    assert_eq!(filed.assigned_employee, Some(3));
    assert_eq!(filed.status, ComplaintStatus::InProgress);
    assert_eq!(filed.location, "N/A");

    let log = desk.store().assignment_log().unwrap();
    assert_eq!(log.len(), 1, "creation counts as the first assignment");
    assert_eq!(log[0].employee_id, 3);
    assert_eq!(log[0].vehicle_id, None);
    assert_eq!(log[0].route_id, Some(1));
}

/// Consecutive intakes spread across the idle pool: 3, then 4, then 7,
/// then back to 3 once everyone carries one open task.
#[test]
fn intake_balances_across_the_department() {
    let desk = ComplaintDesk::new(seeded_store());

    let assignees: Vec<_> = (0..4)
        .map(|_| {
            let id = desk.create_complaint(&complaint(1, None)).unwrap();
            desk.store().get_complaint(id).unwrap().assigned_employee.unwrap()
        })
        .collect();

    assert_eq!(assignees, vec![3, 4, 7, 3]);
}

/// Settled complaints stop counting toward load: resolve employee 3's
/// task and the next intake goes back to 3, not on to 4.
#[test]
fn settled_complaints_do_not_count_as_load() {
    let desk = ComplaintDesk::new(seeded_store());

    let first = desk.create_complaint(&complaint(1, None)).unwrap();
    desk.store()
        .update_complaint_status(first, ComplaintStatus::Resolved)
        .unwrap();

    assert_eq!(desk.select_assignee(1).unwrap(), 3);
}

/// A department with no eligible staff persists nothing: no complaint
/// row, no assignment log entry.
#[test]
fn no_candidate_rolls_back_everything() {
    let desk = ComplaintDesk::new(seeded_store());

    let err = desk.create_complaint(&complaint(3, None)).unwrap_err();
    assert!(matches!(err, TrackError::NoCandidate { department: 3 }), "got {err}");
    assert_eq!(desk.store().complaint_count().unwrap(), 0);
    assert_eq!(desk.store().assignment_count().unwrap(), 0);
}

/// Inactive accounts and non-Employee roles are not assignment targets,
/// even when they are the only staff in the department.
#[test]
fn inactive_and_elevated_accounts_are_ineligible() {
    let desk = ComplaintDesk::new(seeded_store());
    let store = desk.store();

    // Department with a single Inactive employee.
    let idle_dept = store.insert_department("Night Shift", None).unwrap();
    store
        .insert_employee(&common::employee(
            "Jo Braun",
            "jo@wastetrack.gov",
            wastetrack_core::identity::Role::Employee,
            Some(idle_dept),
            "Inactive",
        ))
        .unwrap();
    let err = desk.create_complaint(&complaint(idle_dept, None)).unwrap_err();
    assert!(matches!(err, TrackError::NoCandidate { .. }), "got {err}");

    // Department staffed only by a Manager.
    let mgr_dept = store.insert_department("Oversight", None).unwrap();
    store
        .insert_employee(&common::employee(
            "Vic Salas",
            "vic@wastetrack.gov",
            wastetrack_core::identity::Role::Manager,
            Some(mgr_dept),
            "Active",
        ))
        .unwrap();
    let err = desk.create_complaint(&complaint(mgr_dept, None)).unwrap_err();
    assert!(matches!(err, TrackError::NoCandidate { .. }), "got {err}");
}

/// Required-field validation fires before anything touches storage.
#[test]
fn blank_required_fields_are_rejected() {
    let desk = ComplaintDesk::new(seeded_store());

    let blank_name = NewComplaint {
        citizen_name: "   ".to_string(),
        ..complaint(1, None)
    };
    let err = desk.create_complaint(&blank_name).unwrap_err();
    assert!(matches!(err, TrackError::Validation(_)), "got {err}");

    let no_dept = NewComplaint {
        department_id: 0,
        ..complaint(1, None)
    };
    let err = desk.create_complaint(&no_dept).unwrap_err();
    assert!(matches!(err, TrackError::Validation(_)), "got {err}");

    assert_eq!(desk.store().complaint_count().unwrap(), 0);
}

/// The preview endpoint answers without reserving the pick.
#[test]
fn select_assignee_previews_without_reserving() {
    let desk = ComplaintDesk::new(seeded_store());

    assert_eq!(desk.select_assignee(1).unwrap(), 3);
    assert_eq!(desk.select_assignee(1).unwrap(), 3, "preview takes nothing");

    desk.create_complaint(&complaint(1, None)).unwrap();
    assert_eq!(desk.select_assignee(1).unwrap(), 4);

    let err = desk.select_assignee(3).unwrap_err();
    assert!(matches!(err, TrackError::NoCandidate { department: 3 }), "got {err}");
}
