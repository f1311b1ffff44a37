//! Role-scoped read predicates for complaint listings.
//!
//! RULE: WHERE text is assembled from fixed literals only; every
//! user-supplied value rides in the parameter list. Explicit filters are
//! ANDed onto the role scope — they narrow what a caller sees, never
//! widen it.

use crate::identity::{Caller, Role};
use crate::status::ComplaintStatus;
use crate::types::{DepartmentId, EmployeeId, RouteId};
use chrono::{DateTime, Utc};
use rusqlite::types::Value;

/// The role-derived restriction on a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Head, Admin, or the anonymous reporting context: every row.
    All,
    /// Managers see their own department. `None` (a manager not yet
    /// placed in a department) matches no rows, as SQL `= NULL` would.
    Department(Option<DepartmentId>),
    /// Employees see what is assigned to them.
    Assignee(EmployeeId),
}

pub fn scope_for(caller: Option<&Caller>) -> Scope {
    match caller {
        Some(c) if c.role == Role::Manager => Scope::Department(c.department_id),
        Some(c) if c.role == Role::Employee => Scope::Assignee(c.employee_id),
        _ => Scope::All,
    }
}

/// Filters a caller may add on top of the scope.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub department_id: Option<DepartmentId>,
    pub route_id: Option<RouteId>,
    pub status: Option<ComplaintStatus>,
    pub filed_from: Option<DateTime<Utc>>,
    pub filed_to: Option<DateTime<Utc>>,
}

/// A WHERE fragment plus its bound parameters, in placeholder order.
#[derive(Debug, Default)]
pub struct Predicate {
    clauses: Vec<&'static str>,
    params: Vec<Value>,
}

impl Predicate {
    pub fn build(scope: &Scope, filter: &ComplaintFilter) -> Predicate {
        let mut p = Predicate::default();
        match scope {
            Scope::All => {}
            Scope::Department(dept) => {
                p.push("c.dept_id = ?", opt_int(*dept));
            }
            Scope::Assignee(emp_id) => {
                p.push("c.assigned_emp = ?", Value::Integer(*emp_id));
            }
        }
        if let Some(dept) = filter.department_id {
            p.push("c.dept_id = ?", Value::Integer(dept));
        }
        if let Some(route) = filter.route_id {
            p.push("c.route_id = ?", Value::Integer(route));
        }
        if let Some(status) = filter.status {
            p.push("c.status = ?", Value::Text(status.as_str().to_string()));
        }
        if let Some(from) = filter.filed_from {
            p.push("c.filed_at >= ?", Value::Text(from.to_rfc3339()));
        }
        if let Some(to) = filter.filed_to {
            p.push("c.filed_at <= ?", Value::Text(to.to_rfc3339()));
        }
        p
    }

    fn push(&mut self, clause: &'static str, param: Value) {
        self.clauses.push(clause);
        self.params.push(param);
    }

    /// `" WHERE ..."`, or empty when unrestricted.
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

fn opt_int(v: Option<i64>) -> Value {
    match v {
        Some(v) => Value::Integer(v),
        None => Value::Null,
    }
}
