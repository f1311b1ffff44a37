//! desk-runner: headless complaint-desk runner for wastetrack.
//!
//! Usage:
//!   desk-runner --db track.db --seed-demo
//!   desk-runner --db track.db --ipc-mode
//!
//! In IPC mode the runner reads one JSON command per line on stdin and
//! writes one JSON response per line on stdout. The runner stands in for
//! the authentication layer: `as_employee` names the account a command
//! acts under, and the runner resolves it to a caller context.

use anyhow::Result;
use std::env;
use std::io::{self, BufRead, Write};
use wastetrack_core::{
    error::TrackResult,
    identity::{Caller, Role},
    lifecycle::{ComplaintDesk, NewComplaint},
    report::{NewWasteRecord, ReportView, Reports},
    roster::{EmployeeDirectory, NewEmployee},
    scope::ComplaintFilter,
    status::ComplaintStatus,
    store::TrackStore,
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    FileComplaint {
        complaint: NewComplaint,
    },
    UpdateStatus {
        complaint_id: i64,
        status: String,
        as_employee: i64,
    },
    Reassign {
        complaint_id: i64,
        employee_id: i64,
        #[serde(default)]
        vehicle_id: Option<i64>,
        as_employee: i64,
    },
    ListComplaints {
        #[serde(default)]
        as_employee: Option<i64>,
        #[serde(default)]
        dept_id: Option<i64>,
        #[serde(default)]
        route_id: Option<i64>,
        #[serde(default)]
        status: Option<String>,
    },
    RecordWaste {
        record: NewWasteRecord,
        as_employee: i64,
    },
    Report {
        view: String,
    },
    Stats,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let seed_demo = args.iter().any(|a| a == "--seed-demo");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");

    if !ipc_mode {
        println!("wastetrack desk-runner");
        println!("  db:        {db}");
        println!("  seed demo: {seed_demo}");
        println!();
    }

    // For :memory: use SQLite shared-memory URI so the desk, directory,
    // and report handles all see the same in-memory database.
    let db_effective: String = if db == ":memory:" {
        format!(
            "file:deskrun_{}?mode=memory&cache=shared",
            chrono::Utc::now().timestamp()
        )
    } else {
        db.to_string()
    };
    let store = TrackStore::open(&db_effective)?;
    store.migrate()?;
    if seed_demo {
        seed_demo_data(&store)?;
    }

    let desk = ComplaintDesk::new(store.reopen()?);
    let directory = EmployeeDirectory::new(store.reopen()?);
    let reports = Reports::new(store);

    if ipc_mode {
        run_ipc_loop(&desk, &directory, &reports)?;
    } else {
        print_summary(&reports)?;
    }

    Ok(())
}

fn run_ipc_loop(desk: &ComplaintDesk, directory: &EmployeeDirectory, reports: &Reports) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }
        let response = match handle_command(desk, directory, reports, cmd) {
            Ok(value) => value,
            Err(e) => serde_json::json!({ "error": e.to_string() }),
        };
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(
    desk: &ComplaintDesk,
    directory: &EmployeeDirectory,
    reports: &Reports,
    cmd: IpcCommand,
) -> TrackResult<serde_json::Value> {
    match cmd {
        IpcCommand::FileComplaint { complaint } => {
            let complaint_id = desk.create_complaint(&complaint)?;
            Ok(serde_json::json!({ "complaint_id": complaint_id }))
        }
        IpcCommand::UpdateStatus {
            complaint_id,
            status,
            as_employee,
        } => {
            let status = ComplaintStatus::parse(&status)?;
            let caller = caller_of(directory, Some(as_employee))?;
            desk.update_status(complaint_id, status, caller.as_ref())?;
            Ok(serde_json::json!({ "ok": true }))
        }
        IpcCommand::Reassign {
            complaint_id,
            employee_id,
            vehicle_id,
            as_employee,
        } => {
            let caller = caller_of(directory, Some(as_employee))?;
            desk.reassign(complaint_id, employee_id, vehicle_id, caller.as_ref())?;
            Ok(serde_json::json!({ "ok": true }))
        }
        IpcCommand::ListComplaints {
            as_employee,
            dept_id,
            route_id,
            status,
        } => {
            let caller = caller_of(directory, as_employee)?;
            let filter = ComplaintFilter {
                department_id: dept_id,
                route_id,
                status: status.as_deref().map(ComplaintStatus::parse).transpose()?,
                ..Default::default()
            };
            let rows = desk.list_complaints(caller.as_ref(), &filter)?;
            Ok(serde_json::to_value(rows)?)
        }
        IpcCommand::RecordWaste { record, as_employee } => {
            let caller = caller_of(directory, Some(as_employee))?;
            let record_id = reports.record_collection(caller.as_ref(), &record)?;
            Ok(serde_json::json!({ "record_id": record_id }))
        }
        IpcCommand::Report { view } => {
            let view = ReportView::parse(&view)?;
            let rows = reports.run(view)?;
            Ok(serde_json::to_value(rows)?)
        }
        IpcCommand::Stats => {
            let overview = reports.stats_overview()?;
            Ok(serde_json::to_value(overview)?)
        }
        IpcCommand::Quit => Ok(serde_json::Value::Null),
    }
}

fn caller_of(directory: &EmployeeDirectory, emp: Option<i64>) -> TrackResult<Option<Caller>> {
    match emp {
        Some(id) => Ok(Some(directory.store().get_employee(id)?.as_caller())),
        None => Ok(None),
    }
}

fn print_summary(reports: &Reports) -> Result<()> {
    let overview = reports.stats_overview()?;
    println!("pending complaints:  {}", overview.pending);
    println!("settled complaints:  {}", overview.resolved);
    for row in &overview.vehicle_usage {
        println!("  vehicle {:<10} assignments: {}", row.vehicle_no, row.total_assignments);
    }
    Ok(())
}

/// A small but complete town: two collection departments, shared routes,
/// and a staff roster covering every role.
fn seed_demo_data(store: &TrackStore) -> Result<()> {
    let north = store.insert_department("Collections North", Some("Sector 4 depot"))?;
    let south = store.insert_department("Collections South", Some("Riverside depot"))?;

    let market = store.insert_route("Market Loop", Some("old town"))?;
    let harbor = store.insert_route("Harbor Road", Some("docklands"))?;
    let ridge = store.insert_route("Ridge Line", Some("hill wards"))?;

    let truck_a = store.insert_vehicle("WT-101", Some("compactor"), Some(north))?;
    let truck_b = store.insert_vehicle("WT-202", Some("tipper"), Some(south))?;
    store.link_serves(truck_a, market)?;
    store.link_serves(truck_a, ridge)?;
    store.link_serves(truck_b, harbor)?;

    let staff = [
        ("Asha Verma", "asha@wastetrack.gov", Role::Manager, Some(north)),
        ("Tom Okafor", "tom@wastetrack.gov", Role::Head, None),
        ("Lena Ortiz", "lena@wastetrack.gov", Role::Employee, Some(north)),
        ("Ravi Nair", "ravi@wastetrack.gov", Role::Employee, Some(north)),
        ("Mina Chen", "mina@wastetrack.gov", Role::Employee, Some(south)),
        ("Piotr Nowak", "piotr@wastetrack.gov", Role::Manager, Some(south)),
    ];
    for (name, email, role, dept) in staff {
        store.insert_employee(&NewEmployee {
            name: name.to_string(),
            contact: None,
            email: email.to_string(),
            password_hash: "$external$".to_string(),
            join_date: None,
            emp_code: None,
            department_id: dept,
            role,
            status: "Active".to_string(),
        })?;
    }

    log::info!("demo data seeded: 2 departments, 3 routes, 6 staff");
    Ok(())
}
