//! Shared seeding for the integration suites.
//!
//! Ids follow insert order. Departments: 1 Collections North,
//! 2 Collections South, 3 Transfer Station (no staff). Routes:
//! 1 Market Loop, 2 Harbor Road. Vehicles: 1 WT-101 (dept 1),
//! 2 WT-202 (dept 2).
//!
//! Staff roster:
//!   1 Manager  dept 1          6 Employee dept 1 (Inactive)
//!   2 Head     unplaced        7 Employee dept 1
//!   3 Employee dept 1          8 Employee dept 2
//!   4 Employee dept 1          9 Manager  dept 2
//!   5 Employee dept 2

#![allow(dead_code)]

use wastetrack_core::{
    identity::{Caller, Role},
    lifecycle::NewComplaint,
    roster::NewEmployee,
    store::TrackStore,
};

pub fn seeded_store() -> TrackStore {
    let store = TrackStore::in_memory().unwrap();
    store.migrate().unwrap();

    store.insert_department("Collections North", None).unwrap();
    store.insert_department("Collections South", None).unwrap();
    store.insert_department("Transfer Station", None).unwrap();

    store.insert_route("Market Loop", Some("old town")).unwrap();
    store.insert_route("Harbor Road", Some("docklands")).unwrap();

    store
        .insert_vehicle("WT-101", Some("compactor"), Some(1))
        .unwrap();
    store
        .insert_vehicle("WT-202", Some("tipper"), Some(2))
        .unwrap();
    store.link_serves(1, 1).unwrap();
    store.link_serves(2, 2).unwrap();

    let roster = [
        ("Asha Verma", Role::Manager, Some(1), "Active"),
        ("Tom Okafor", Role::Head, None, "Active"),
        ("Lena Ortiz", Role::Employee, Some(1), "Active"),
        ("Ravi Nair", Role::Employee, Some(1), "Active"),
        ("Mina Chen", Role::Employee, Some(2), "Active"),
        ("Omar Diallo", Role::Employee, Some(1), "Inactive"),
        ("Sara Holt", Role::Employee, Some(1), "Active"),
        ("Ines Rocha", Role::Employee, Some(2), "Active"),
        ("Piotr Nowak", Role::Manager, Some(2), "Active"),
    ];
    for (i, (name, role, dept, status)) in roster.iter().enumerate() {
        let email = format!("staff{}@wastetrack.gov", i + 1);
        store
            .insert_employee(&employee(name, &email, *role, *dept, status))
            .unwrap();
    }

    store
}

pub fn employee(
    name: &str,
    email: &str,
    role: Role,
    dept: Option<i64>,
    status: &str,
) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        contact: None,
        email: email.to_string(),
        password_hash: "$external$".to_string(),
        join_date: None,
        emp_code: None,
        department_id: dept,
        role,
        status: status.to_string(),
    }
}

pub fn caller(employee_id: i64, role: Role, dept: Option<i64>) -> Caller {
    Caller::new(employee_id, role, dept)
}

pub fn complaint(dept: i64, route: Option<i64>) -> NewComplaint {
    NewComplaint {
        citizen_name: "R. Iyer".to_string(),
        contact_no: "555-0142".to_string(),
        location: None,
        description: "missed pickup on collection day".to_string(),
        department_id: dept,
        route_id: route,
    }
}
