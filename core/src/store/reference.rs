//! Reference entities (departments, routes, vehicles, waste records) and
//! the fixed reporting queries.

use super::TrackStore;
use crate::{
    error::{TrackError, TrackResult},
    report::{ReportView, VehicleUsageRow},
    roster::{DepartmentRow, RouteRow, VehicleRow},
    types::{DepartmentId, RouteId, VehicleId},
};
use chrono::{DateTime, Utc};
use rusqlite::types::ValueRef;
use rusqlite::params;

fn row_to_json(row: &rusqlite::Row<'_>, cols: &[String]) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    for (i, name) in cols.iter().enumerate() {
        let value = match row.get_ref(i) {
            Ok(ValueRef::Integer(n)) => serde_json::Value::from(n),
            Ok(ValueRef::Real(f)) => serde_json::Value::from(f),
            Ok(ValueRef::Text(t)) => {
                serde_json::Value::from(String::from_utf8_lossy(t).into_owned())
            }
            _ => serde_json::Value::Null,
        };
        obj.insert(name.clone(), value);
    }
    serde_json::Value::Object(obj)
}

impl TrackStore {
    // ── Seeding ────────────────────────────────────────────────

    pub fn insert_department(&self, name: &str, location: Option<&str>) -> TrackResult<DepartmentId> {
        self.conn.execute(
            "INSERT INTO department (name, location) VALUES (?1, ?2)",
            params![name, location],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_route(&self, route_name: &str, area: Option<&str>) -> TrackResult<RouteId> {
        self.conn.execute(
            "INSERT INTO route (route_name, area) VALUES (?1, ?2)",
            params![route_name, area],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_vehicle(
        &self,
        vehicle_no: &str,
        vehicle_type: Option<&str>,
        dept: Option<DepartmentId>,
    ) -> TrackResult<VehicleId> {
        self.conn.execute(
            "INSERT INTO vehicle (vehicle_no, vehicle_type, status, dept_id)
             VALUES (?1, ?2, 'Available', ?3)",
            params![vehicle_no, vehicle_type, dept],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Mark a vehicle as serving a route.
    pub fn link_serves(&self, vehicle_id: VehicleId, route_id: RouteId) -> TrackResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO serves (vehicle_id, route_id) VALUES (?1, ?2)",
            params![vehicle_id, route_id],
        )?;
        Ok(())
    }

    // ── Reference reads ────────────────────────────────────────

    pub fn departments(&self) -> TrackResult<Vec<DepartmentRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT dept_id, name, location FROM department ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(DepartmentRow {
                department_id: row.get(0)?,
                name: row.get(1)?,
                location: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn routes(&self) -> TrackResult<Vec<RouteRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT route_id, route_name, area FROM route ORDER BY route_name")?;
        let rows = stmt.query_map([], route_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Routes served by a department's vehicles.
    pub fn routes_for_department(&self, dept: DepartmentId) -> TrackResult<Vec<RouteRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT r.route_id, r.route_name, r.area
             FROM route r
             JOIN serves s ON r.route_id = s.route_id
             JOIN vehicle v ON s.vehicle_id = v.vehicle_id
             WHERE v.dept_id = ?1
             ORDER BY r.route_name",
        )?;
        let rows = stmt.query_map(params![dept], route_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn list_vehicles(&self, dept: Option<DepartmentId>) -> TrackResult<Vec<VehicleRow>> {
        let vehicle_mapper = |row: &rusqlite::Row<'_>| {
            Ok(VehicleRow {
                vehicle_id: row.get(0)?,
                vehicle_no: row.get(1)?,
                vehicle_type: row.get(2)?,
                status: row.get(3)?,
                department_id: row.get(4)?,
            })
        };
        match dept {
            Some(dept) => {
                let mut stmt = self.conn.prepare(
                    "SELECT vehicle_id, vehicle_no, vehicle_type, status, dept_id
                     FROM vehicle WHERE dept_id = ?1 ORDER BY vehicle_id",
                )?;
                let rows = stmt.query_map(params![dept], vehicle_mapper)?;
                rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT vehicle_id, vehicle_no, vehicle_type, status, dept_id
                     FROM vehicle ORDER BY vehicle_id",
                )?;
                let rows = stmt.query_map([], vehicle_mapper)?;
                rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
            }
        }
    }

    // ── Waste records ──────────────────────────────────────────

    pub fn insert_waste_record(
        &self,
        route_id: RouteId,
        waste_type: Option<&str>,
        weight_kg: f64,
        collection_date: DateTime<Utc>,
    ) -> TrackResult<i64> {
        let result = self.conn.execute(
            "INSERT INTO waste_record (route_id, waste_type, weight_kg, collection_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![route_id, waste_type, weight_kg, collection_date],
        );
        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                Err(TrackError::NotFound {
                    what: "route",
                    id: route_id,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    // ── Reporting ──────────────────────────────────────────────

    /// One fixed query per reportable view. No part of the SQL comes
    /// from the caller.
    pub fn report_rows(&self, view: ReportView) -> TrackResult<Vec<serde_json::Value>> {
        let sql = match view {
            ReportView::PendingComplaints => {
                "SELECT c.complaint_id, c.citizen_name, c.location, c.status, c.filed_at,
                        d.name AS department_name, r.route_name, e.name AS assigned_employee
                 FROM complaint c
                 LEFT JOIN department d ON c.dept_id = d.dept_id
                 LEFT JOIN route r ON c.route_id = r.route_id
                 LEFT JOIN employee e ON c.assigned_emp = e.emp_id
                 WHERE c.status IN ('Open', 'In Progress')
                 ORDER BY c.complaint_id DESC LIMIT 1000"
            }
            ReportView::VehicleUsage => {
                "SELECT v.vehicle_id, v.vehicle_no, v.vehicle_type,
                        COUNT(a.assign_id) AS total_assignments
                 FROM vehicle v
                 LEFT JOIN assigned_to a ON v.vehicle_id = a.vehicle_id
                 GROUP BY v.vehicle_id
                 ORDER BY total_assignments DESC, v.vehicle_id ASC LIMIT 1000"
            }
            ReportView::DepartmentSummary => {
                "SELECT d.dept_id, d.name AS department_name,
                        COUNT(c.complaint_id) AS total_complaints,
                        SUM(CASE WHEN c.status IN ('Open', 'In Progress') THEN 1 ELSE 0 END)
                            AS open_complaints,
                        SUM(CASE WHEN c.status IN ('Resolved', 'Closed') THEN 1 ELSE 0 END)
                            AS settled_complaints
                 FROM department d
                 LEFT JOIN complaint c ON c.dept_id = d.dept_id
                 GROUP BY d.dept_id
                 ORDER BY d.name LIMIT 1000"
            }
            ReportView::WasteCollectionStats => {
                "SELECT r.route_id, r.route_name,
                        COUNT(w.record_id) AS collections,
                        COALESCE(SUM(w.weight_kg), 0.0) AS total_weight_kg
                 FROM route r
                 LEFT JOIN waste_record w ON w.route_id = r.route_id
                 GROUP BY r.route_id
                 ORDER BY r.route_name LIMIT 1000"
            }
            ReportView::EmployeePerformance => {
                "SELECT e.emp_id, e.name,
                        SUM(CASE WHEN c.status = 'Resolved' THEN 1 ELSE 0 END) AS resolved_count,
                        SUM(CASE WHEN c.status = 'Closed' THEN 1 ELSE 0 END) AS closed_count
                 FROM employee e
                 LEFT JOIN complaint c ON c.assigned_emp = e.emp_id
                 WHERE e.role = 'Employee'
                 GROUP BY e.emp_id
                 ORDER BY e.emp_id LIMIT 1000"
            }
            ReportView::EmployeeTasks => {
                "SELECT e.emp_id, e.name, COUNT(c.complaint_id) AS open_tasks
                 FROM employee e
                 LEFT JOIN complaint c ON c.assigned_emp = e.emp_id
                                      AND c.status IN ('Open', 'In Progress')
                 WHERE e.role = 'Employee'
                 GROUP BY e.emp_id
                 ORDER BY e.emp_id LIMIT 1000"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let cols: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let rows = stmt.query_map([], |row| Ok(row_to_json(row, &cols)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn pending_resolved_counts(&self) -> TrackResult<(i64, i64)> {
        self.conn
            .query_row(
                "SELECT COALESCE(SUM(CASE WHEN status IN ('Open', 'In Progress')
                                          THEN 1 ELSE 0 END), 0),
                        COALESCE(SUM(CASE WHEN status IN ('Resolved', 'Closed')
                                          THEN 1 ELSE 0 END), 0)
                 FROM complaint",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(Into::into)
    }

    pub fn top_vehicle_usage(&self, limit: i64) -> TrackResult<Vec<VehicleUsageRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT v.vehicle_no, COUNT(a.assign_id) AS total_assignments
             FROM vehicle v
             LEFT JOIN assigned_to a ON v.vehicle_id = a.vehicle_id
             GROUP BY v.vehicle_id
             ORDER BY total_assignments DESC, v.vehicle_id ASC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(VehicleUsageRow {
                vehicle_no: row.get(0)?,
                total_assignments: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn waste_record_count(&self) -> TrackResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM waste_record", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

fn route_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<RouteRow> {
    Ok(RouteRow {
        route_id: row.get(0)?,
        route_name: row.get(1)?,
        area: row.get(2)?,
    })
}
