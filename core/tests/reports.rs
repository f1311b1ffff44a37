//! Reporting: the closed view set and the headline stats.

mod common;

use chrono::Utc;
use common::{caller, complaint, seeded_store};
use wastetrack_core::{
    error::TrackError,
    identity::Role,
    report::{NewWasteRecord, ReportView, Reports},
    status::ComplaintStatus,
};

#[test]
fn every_view_runs_against_seeded_data() {
    let reports = Reports::new(seeded_store());
    reports
        .store()
        .create_complaint_assigned(&complaint(1, Some(1)), Utc::now())
        .unwrap();

    for view in ReportView::ALL {
        let rows = reports.run(view).unwrap();
        match view {
            ReportView::PendingComplaints => assert_eq!(rows.len(), 1),
            // One row per route / department / eligible employee.
            ReportView::WasteCollectionStats => assert_eq!(rows.len(), 2),
            ReportView::DepartmentSummary => assert_eq!(rows.len(), 3),
            _ => assert!(!rows.is_empty(), "{} returned nothing", view.as_str()),
        }
    }
}

/// View names parse through the closed enum; nothing else reaches SQL.
#[test]
fn view_names_are_a_closed_set() {
    assert_eq!(
        ReportView::parse("pending_complaints").unwrap(),
        ReportView::PendingComplaints
    );
    for bad in ["v_pending_complaints", "complaint; DROP TABLE complaint", ""] {
        let err = ReportView::parse(bad).unwrap_err();
        assert!(matches!(err, TrackError::Validation(_)), "{bad:?} got {err}");
    }
}

#[test]
fn stats_overview_tracks_the_lifecycle() {
    let reports = Reports::new(seeded_store());
    let store = reports.store();

    let (a, _) = store
        .create_complaint_assigned(&complaint(1, None), Utc::now())
        .unwrap();
    store
        .create_complaint_assigned(&complaint(2, None), Utc::now())
        .unwrap();
    store.update_complaint_status(a, ComplaintStatus::Resolved).unwrap();

    let overview = reports.stats_overview().unwrap();
    assert_eq!(overview.pending, 1);
    assert_eq!(overview.resolved, 1);
    assert_eq!(overview.vehicle_usage.len(), 2, "all vehicles listed");
}

/// Vehicle usage counts assignment log entries, which only carry a
/// vehicle on reassignment.
#[test]
fn vehicle_usage_counts_logged_assignments() {
    let reports = Reports::new(seeded_store());
    let store = reports.store();

    let (id, _) = store
        .create_complaint_assigned(&complaint(2, Some(2)), Utc::now())
        .unwrap();
    store.reassign_complaint(id, 8, Some(2), Utc::now()).unwrap();

    let usage = reports.stats_overview().unwrap().vehicle_usage;
    assert_eq!(usage[0].vehicle_no, "WT-202");
    assert_eq!(usage[0].total_assignments, 1);

    let rows = reports.run(ReportView::VehicleUsage).unwrap();
    let wt202 = rows
        .iter()
        .find(|r| r["vehicle_no"] == "WT-202")
        .expect("WT-202 row");
    assert_eq!(wt202["total_assignments"].as_i64(), Some(1));
}

#[test]
fn employee_tasks_reflect_open_load() {
    let reports = Reports::new(seeded_store());
    reports
        .store()
        .create_complaint_assigned(&complaint(1, None), Utc::now())
        .unwrap(); // -> employee 3

    let rows = reports.run(ReportView::EmployeeTasks).unwrap();
    let lena = rows.iter().find(|r| r["emp_id"] == 3).expect("employee 3 row");
    assert_eq!(lena["open_tasks"].as_i64(), Some(1));
    let idle = rows.iter().find(|r| r["emp_id"] == 4).expect("employee 4 row");
    assert_eq!(idle["open_tasks"].as_i64(), Some(0));
}

#[test]
fn waste_records_are_gated_and_aggregated() {
    let reports = Reports::new(seeded_store());
    let record = NewWasteRecord {
        route_id: 1,
        waste_type: Some("organic".to_string()),
        weight_kg: 420.5,
        collection_date: None,
    };

    let err = reports.record_collection(None, &record).unwrap_err();
    assert!(matches!(err, TrackError::NotAuthenticated), "got {err}");

    let staff = caller(3, Role::Employee, Some(1));
    reports.record_collection(Some(&staff), &record).unwrap();
    reports
        .record_collection(
            Some(&staff),
            &NewWasteRecord {
                weight_kg: 79.5,
                ..record.clone()
            },
        )
        .unwrap();

    let rows = reports.run(ReportView::WasteCollectionStats).unwrap();
    let market = rows
        .iter()
        .find(|r| r["route_name"] == "Market Loop")
        .expect("Market Loop row");
    assert_eq!(market["collections"].as_i64(), Some(2));
    assert_eq!(market["total_weight_kg"].as_f64(), Some(500.0));

    // Unknown route or nonsense weight never lands.
    let err = reports
        .record_collection(
            Some(&staff),
            &NewWasteRecord {
                route_id: 9999,
                ..record.clone()
            },
        )
        .unwrap_err();
    assert!(matches!(err, TrackError::NotFound { what: "route", .. }), "got {err}");

    let err = reports
        .record_collection(
            Some(&staff),
            &NewWasteRecord {
                weight_kg: 0.0,
                ..record
            },
        )
        .unwrap_err();
    assert!(matches!(err, TrackError::Validation(_)), "got {err}");

    assert_eq!(reports.store().waste_record_count().unwrap(), 2);
}
