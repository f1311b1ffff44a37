//! Complaint and assignment-log database queries.

use super::TrackStore;
use crate::{
    error::{TrackError, TrackResult},
    lifecycle::{AssignmentRecord, ComplaintRecord, ComplaintView, NewComplaint},
    scope::Predicate,
    status::ComplaintStatus,
    types::{ComplaintId, DepartmentId, EmployeeId, VehicleId},
    workload,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

fn complaint_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<ComplaintRecord> {
    Ok(ComplaintRecord {
        complaint_id: row.get(0)?,
        citizen_name: row.get(1)?,
        contact_no: row.get(2)?,
        location: row.get(3)?,
        description: row.get(4)?,
        filed_at: row.get(5)?,
        department_id: row.get(6)?,
        route_id: row.get(7)?,
        assigned_employee: row.get(8)?,
        status: row.get(9)?,
    })
}

impl TrackStore {
    // ── Intake ─────────────────────────────────────────────────

    /// File a complaint and its first assignment log entry in one
    /// transaction. Returns the new complaint id and the selected
    /// assignee. An empty eligible set aborts with nothing persisted.
    pub fn create_complaint_assigned(
        &self,
        input: &NewComplaint,
        filed_at: DateTime<Utc>,
    ) -> TrackResult<(ComplaintId, EmployeeId)> {
        let tx = self.conn.unchecked_transaction()?;
        let workloads = Self::eligible_workloads(&tx, input.department_id)?;
        let Some(assignee) = workload::pick_least_loaded(&workloads) else {
            // Dropping the transaction rolls it back.
            return Err(TrackError::NoCandidate {
                department: input.department_id,
            });
        };
        let location = input
            .location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or("N/A");
        tx.execute(
            "INSERT INTO complaint (citizen_name, contact_no, location, description,
                                    filed_at, dept_id, route_id, assigned_emp, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'In Progress')",
            params![
                &input.citizen_name,
                &input.contact_no,
                location,
                &input.description,
                filed_at,
                input.department_id,
                input.route_id,
                assignee,
            ],
        )?;
        let complaint_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO assigned_to (emp_id, vehicle_id, route_id, assign_date)
             VALUES (?1, NULL, ?2, ?3)",
            params![assignee, input.route_id, filed_at],
        )?;
        tx.commit()?;
        Ok((complaint_id, assignee))
    }

    /// Open-task counts for the eligible employees of a department:
    /// role `Employee`, account `Active`. Idle employees appear with a
    /// zero count so the estimator can see them.
    fn eligible_workloads(
        conn: &Connection,
        dept: DepartmentId,
    ) -> TrackResult<Vec<(EmployeeId, i64)>> {
        let mut stmt = conn.prepare(
            "SELECT e.emp_id, COUNT(c.complaint_id) AS task_count
             FROM employee e
             LEFT JOIN complaint c ON e.emp_id = c.assigned_emp
                                  AND c.status IN ('Open', 'In Progress')
             WHERE e.dept_id = ?1 AND e.role = 'Employee' AND e.status = 'Active'
             GROUP BY e.emp_id",
        )?;
        let rows = stmt.query_map(params![dept], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn open_task_counts(&self, dept: DepartmentId) -> TrackResult<Vec<(EmployeeId, i64)>> {
        Self::eligible_workloads(&self.conn, dept)
    }

    // ── Reads ──────────────────────────────────────────────────

    pub fn get_complaint(&self, complaint_id: ComplaintId) -> TrackResult<ComplaintRecord> {
        self.conn
            .query_row(
                "SELECT complaint_id, citizen_name, contact_no, location, description,
                        filed_at, dept_id, route_id, assigned_emp, status
                 FROM complaint WHERE complaint_id = ?1",
                params![complaint_id],
                complaint_row_mapper,
            )
            .optional()?
            .ok_or(TrackError::NotFound {
                what: "complaint",
                id: complaint_id,
            })
    }

    pub fn list_complaints(&self, predicate: &Predicate) -> TrackResult<Vec<ComplaintView>> {
        // Clause text comes from fixed literals inside Predicate; caller
        // values are bound below.
        let sql = format!(
            "SELECT c.complaint_id, c.citizen_name, c.contact_no, c.location, c.description,
                    c.filed_at, c.dept_id, c.route_id, c.assigned_emp, c.status, r.route_name
             FROM complaint c
             LEFT JOIN route r ON c.route_id = r.route_id{}
             ORDER BY c.complaint_id DESC",
            predicate.where_sql()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(predicate.params().iter()), |row| {
            Ok(ComplaintView {
                complaint_id: row.get(0)?,
                citizen_name: row.get(1)?,
                contact_no: row.get(2)?,
                location: row.get(3)?,
                description: row.get(4)?,
                filed_at: row.get(5)?,
                department_id: row.get(6)?,
                route_id: row.get(7)?,
                assigned_employee: row.get(8)?,
                status: row.get(9)?,
                route_name: row.get(10)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Status ─────────────────────────────────────────────────

    pub fn update_complaint_status(
        &self,
        complaint_id: ComplaintId,
        status: ComplaintStatus,
    ) -> TrackResult<()> {
        let changed = self.conn.execute(
            "UPDATE complaint SET status = ?1 WHERE complaint_id = ?2",
            params![status, complaint_id],
        )?;
        if changed == 0 {
            return Err(TrackError::NotFound {
                what: "complaint",
                id: complaint_id,
            });
        }
        Ok(())
    }

    // ── Reassignment ───────────────────────────────────────────

    /// Move a complaint to a new assignee and append the log entry, in
    /// one transaction. A missing complaint or employee aborts with
    /// nothing written.
    pub fn reassign_complaint(
        &self,
        complaint_id: ComplaintId,
        employee_id: EmployeeId,
        vehicle_id: Option<VehicleId>,
        assigned_at: DateTime<Utc>,
    ) -> TrackResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let known: Option<i64> = tx
            .query_row(
                "SELECT emp_id FROM employee WHERE emp_id = ?1",
                params![employee_id],
                |row| row.get(0),
            )
            .optional()?;
        if known.is_none() {
            return Err(TrackError::NotFound {
                what: "employee",
                id: employee_id,
            });
        }
        let changed = tx.execute(
            "UPDATE complaint SET assigned_emp = ?1, status = 'In Progress'
             WHERE complaint_id = ?2",
            params![employee_id, complaint_id],
        )?;
        if changed == 0 {
            return Err(TrackError::NotFound {
                what: "complaint",
                id: complaint_id,
            });
        }
        let route_id: Option<i64> = tx.query_row(
            "SELECT route_id FROM complaint WHERE complaint_id = ?1",
            params![complaint_id],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO assigned_to (emp_id, vehicle_id, route_id, assign_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![employee_id, vehicle_id, route_id, assigned_at],
        )?;
        tx.commit()?;
        Ok(())
    }

    // ── Assignment log ─────────────────────────────────────────

    /// Every assignment event, oldest first. The log is append-only:
    /// there is no update or delete counterpart to this read.
    pub fn assignment_log(&self) -> TrackResult<Vec<AssignmentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT assign_id, emp_id, vehicle_id, route_id, assign_date
             FROM assigned_to ORDER BY assign_id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(AssignmentRecord {
                assign_id: row.get(0)?,
                employee_id: row.get(1)?,
                vehicle_id: row.get(2)?,
                route_id: row.get(3)?,
                assigned_at: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Test / summary helpers ─────────────────────────────────

    pub fn complaint_count(&self) -> TrackResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM complaint", [], |row| row.get(0))
            .map_err(Into::into)
    }

    pub fn assignment_count(&self) -> TrackResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM assigned_to", [], |row| row.get(0))
            .map_err(Into::into)
    }
}
