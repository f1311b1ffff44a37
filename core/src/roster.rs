//! Employee directory — roster administration and reference listings.
//!
//! Account management proper (registration, credential checks) lives in
//! the authentication layer; what the desk owns is the Head-gated roster
//! view, role changes, deletion, and the staff/vehicle/route lookups the
//! assignment forms need.

use crate::{
    error::TrackResult,
    identity::{Caller, Role},
    policy::{self, Operation},
    store::TrackStore,
    types::{DepartmentId, EmployeeId, RouteId, VehicleId},
};
use serde::{Deserialize, Serialize};

/// A staff account row as seeded or registered. `password_hash` is
/// opaque: the desk stores it, never reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub contact: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub join_date: Option<String>,
    pub emp_code: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub role: Role,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub employee_id: EmployeeId,
    pub name: String,
    pub contact: Option<String>,
    pub email: String,
    pub department_id: Option<DepartmentId>,
    pub role: Role,
    pub status: String,
}

impl EmployeeRecord {
    /// The caller context this account acts under once authenticated.
    pub fn as_caller(&self) -> Caller {
        Caller::new(self.employee_id, self.role, self.department_id)
    }
}

/// Row of the Head roster listing, joined with the department name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeListing {
    pub employee_id: EmployeeId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department_id: Option<DepartmentId>,
    pub department_name: Option<String>,
}

/// Row of the staff lookup used when picking a reassignment target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffRow {
    pub employee_id: EmployeeId,
    pub name: String,
    pub contact: Option<String>,
    pub department_id: Option<DepartmentId>,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentRow {
    pub department_id: DepartmentId,
    pub name: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRow {
    pub route_id: RouteId,
    pub route_name: String,
    pub area: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRow {
    pub vehicle_id: VehicleId,
    pub vehicle_no: String,
    pub vehicle_type: Option<String>,
    pub status: String,
    pub department_id: Option<DepartmentId>,
}

pub struct EmployeeDirectory {
    store: TrackStore,
}

impl EmployeeDirectory {
    pub fn new(store: TrackStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    // ── Head-only roster administration ────────────────────────

    /// Full roster listing with optional substring search (name, email,
    /// employee code) and department filter.
    pub fn list_employees(
        &self,
        caller: Option<&Caller>,
        q: Option<&str>,
        department_id: Option<DepartmentId>,
    ) -> TrackResult<Vec<EmployeeListing>> {
        policy::decide(caller, Operation::ListAllEmployees).into_result()?;
        self.store.search_employees(q, department_id)
    }

    pub fn change_role(
        &self,
        caller: Option<&Caller>,
        employee_id: EmployeeId,
        role: Role,
    ) -> TrackResult<()> {
        policy::decide(caller, Operation::ChangeRole).into_result()?;
        self.store.update_role(employee_id, role)?;
        log::debug!("employee {employee_id} role set to {role}");
        Ok(())
    }

    /// Remove an account. An employee still referenced by complaints or
    /// assignment records cannot be deleted; that surfaces as a conflict,
    /// not a storage failure.
    pub fn delete_employee(
        &self,
        caller: Option<&Caller>,
        employee_id: EmployeeId,
    ) -> TrackResult<()> {
        policy::decide(caller, Operation::DeleteEmployee).into_result()?;
        self.store.delete_employee(employee_id)
    }

    // ── Authenticated lookups ──────────────────────────────────

    /// Staff listing. A Manager with no explicit department filter sees
    /// their own department.
    pub fn list_staff(
        &self,
        caller: Option<&Caller>,
        role: Option<Role>,
        department_id: Option<DepartmentId>,
    ) -> TrackResult<Vec<StaffRow>> {
        policy::decide(caller, Operation::ListStaff).into_result()?;
        let department_id = department_id.or_else(|| manager_home_department(caller));
        self.store.list_staff(role, department_id)
    }

    pub fn list_vehicles(
        &self,
        caller: Option<&Caller>,
        department_id: Option<DepartmentId>,
    ) -> TrackResult<Vec<VehicleRow>> {
        policy::decide(caller, Operation::ListVehicles).into_result()?;
        let department_id = department_id.or_else(|| manager_home_department(caller));
        self.store.list_vehicles(department_id)
    }

    // ── Public reference reads ─────────────────────────────────

    pub fn departments(&self) -> TrackResult<Vec<DepartmentRow>> {
        self.store.departments()
    }

    /// Routes, optionally restricted to those a department's vehicles
    /// serve.
    pub fn routes(&self, department_id: Option<DepartmentId>) -> TrackResult<Vec<RouteRow>> {
        match department_id {
            Some(dept) => self.store.routes_for_department(dept),
            None => self.store.routes(),
        }
    }
}

fn manager_home_department(caller: Option<&Caller>) -> Option<DepartmentId> {
    caller
        .filter(|c| c.role == Role::Manager)
        .and_then(|c| c.department_id)
}
