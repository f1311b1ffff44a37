//! Caller identity, as established by the authentication layer.
//!
//! The core never sees credentials. Whatever sits in front of it (session
//! middleware, the desk-runner, a test) resolves a login to a `Caller` and
//! threads it into every operation explicitly — there is no ambient
//! request state to read from.

use crate::error::{TrackError, TrackResult};
use crate::types::{DepartmentId, EmployeeId};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff role. Only `Employee` accounts are eligible assignment targets;
/// the other roles exist for access scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Employee,
    Manager,
    Head,
    Admin,
}

impl Role {
    /// The TEXT stored in the `role` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::Head => "Head",
            Role::Admin => "Admin",
        }
    }

    pub fn parse(s: &str) -> TrackResult<Self> {
        match s {
            "Employee" => Ok(Role::Employee),
            "Manager" => Ok(Role::Manager),
            "Head" => Ok(Role::Head),
            "Admin" => Ok(Role::Admin),
            _ => Err(TrackError::Validation("invalid role")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Role::parse(s).map_err(|_| FromSqlError::Other("unrecognized role".into()))
    }
}

/// The identity a request acts under. `department_id` is `None` for
/// accounts registered before being placed in a department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub employee_id: EmployeeId,
    pub role: Role,
    pub department_id: Option<DepartmentId>,
}

impl Caller {
    pub fn new(employee_id: EmployeeId, role: Role, department_id: Option<DepartmentId>) -> Self {
        Self {
            employee_id,
            role,
            department_id,
        }
    }
}
