//! Employee roster database queries.

use super::TrackStore;
use crate::{
    error::{TrackError, TrackResult},
    identity::Role,
    roster::{EmployeeListing, EmployeeRecord, NewEmployee, StaffRow},
    types::{DepartmentId, EmployeeId},
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn is_fk_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

impl TrackStore {
    // ── Accounts ───────────────────────────────────────────────

    /// Insert a staff account (seeding; registration proper lives in the
    /// authentication layer). Duplicate email surfaces as a conflict.
    pub fn insert_employee(&self, e: &NewEmployee) -> TrackResult<EmployeeId> {
        let result = self.conn.execute(
            "INSERT INTO employee (name, contact, email, password_hash, join_date,
                                   emp_code, dept_id, role, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &e.name,
                e.contact.as_deref(),
                &e.email,
                &e.password_hash,
                e.join_date.as_deref(),
                e.emp_code.as_deref(),
                e.department_id,
                e.role,
                &e.status,
            ],
        );
        match result {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => {
                Err(TrackError::Conflict("email already used"))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn get_employee(&self, employee_id: EmployeeId) -> TrackResult<EmployeeRecord> {
        self.conn
            .query_row(
                "SELECT emp_id, name, contact, email, dept_id, role, status
                 FROM employee WHERE emp_id = ?1",
                params![employee_id],
                |row| {
                    Ok(EmployeeRecord {
                        employee_id: row.get(0)?,
                        name: row.get(1)?,
                        contact: row.get(2)?,
                        email: row.get(3)?,
                        department_id: row.get(4)?,
                        role: row.get(5)?,
                        status: row.get(6)?,
                    })
                },
            )
            .optional()?
            .ok_or(TrackError::NotFound {
                what: "employee",
                id: employee_id,
            })
    }

    // ── Roster listing ─────────────────────────────────────────

    /// Head roster view: substring search over name/email/employee code,
    /// optional department restriction, newest accounts first.
    pub fn search_employees(
        &self,
        q: Option<&str>,
        dept: Option<DepartmentId>,
    ) -> TrackResult<Vec<EmployeeListing>> {
        let mut sql = String::from(
            "SELECT e.emp_id, e.name, e.email, e.role, e.dept_id, d.name
             FROM employee e
             LEFT JOIN department d ON e.dept_id = d.dept_id",
        );
        let mut clauses: Vec<&str> = Vec::new();
        let mut params_vec: Vec<Value> = Vec::new();
        if let Some(q) = q.filter(|q| !q.trim().is_empty()) {
            clauses.push("(e.name LIKE ? OR e.email LIKE ? OR e.emp_code LIKE ?)");
            let like = format!("%{q}%");
            params_vec.push(Value::Text(like.clone()));
            params_vec.push(Value::Text(like.clone()));
            params_vec.push(Value::Text(like));
        }
        if let Some(dept) = dept {
            clauses.push("e.dept_id = ?");
            params_vec.push(Value::Integer(dept));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY e.emp_id DESC LIMIT 1000");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params_vec.iter()), |row| {
            Ok(EmployeeListing {
                employee_id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                role: row.get(3)?,
                department_id: row.get(4)?,
                department_name: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn list_staff(
        &self,
        role: Option<Role>,
        dept: Option<DepartmentId>,
    ) -> TrackResult<Vec<StaffRow>> {
        let mut sql = String::from("SELECT emp_id, name, contact, dept_id, role FROM employee");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params_vec: Vec<Value> = Vec::new();
        if let Some(role) = role {
            clauses.push("role = ?");
            params_vec.push(Value::Text(role.as_str().to_string()));
        }
        if let Some(dept) = dept {
            clauses.push("dept_id = ?");
            params_vec.push(Value::Integer(dept));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY emp_id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params_vec.iter()), |row| {
            Ok(StaffRow {
                employee_id: row.get(0)?,
                name: row.get(1)?,
                contact: row.get(2)?,
                department_id: row.get(3)?,
                role: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Mutations ──────────────────────────────────────────────

    pub fn update_role(&self, employee_id: EmployeeId, role: Role) -> TrackResult<()> {
        let changed = self.conn.execute(
            "UPDATE employee SET role = ?1 WHERE emp_id = ?2",
            params![role, employee_id],
        )?;
        if changed == 0 {
            return Err(TrackError::NotFound {
                what: "employee",
                id: employee_id,
            });
        }
        Ok(())
    }

    pub fn delete_employee(&self, employee_id: EmployeeId) -> TrackResult<()> {
        let result = self.conn.execute(
            "DELETE FROM employee WHERE emp_id = ?1",
            params![employee_id],
        );
        match result {
            Ok(0) => Err(TrackError::NotFound {
                what: "employee",
                id: employee_id,
            }),
            Ok(_) => Ok(()),
            Err(err) if is_fk_violation(&err) => Err(TrackError::Conflict(
                "cannot delete employee: still referenced by complaints or assignments",
            )),
            Err(err) => Err(err.into()),
        }
    }
}
