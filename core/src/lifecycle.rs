//! Complaint lifecycle manager — intake, status transitions,
//! reassignment, and the scoped listing.
//!
//! RULES:
//!   - Assignee selection and the insert it feeds share one transaction;
//!     a complaint is never observable half-created.
//!   - Reassignment and its log append share one transaction; a complaint
//!     is never reassigned-but-unlogged.
//!   - Every operation takes the caller context as an explicit parameter.

use crate::{
    error::{TrackError, TrackResult},
    identity::{Caller, Role},
    policy::{self, Operation},
    scope::{scope_for, ComplaintFilter, Predicate},
    status::ComplaintStatus,
    store::TrackStore,
    types::{ComplaintId, DepartmentId, EmployeeId, RouteId, VehicleId},
    workload,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Intake form for a new complaint. Location falls back to the `N/A`
/// sentinel existing rows use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComplaint {
    pub citizen_name: String,
    pub contact_no: String,
    #[serde(default)]
    pub location: Option<String>,
    pub description: String,
    pub department_id: DepartmentId,
    #[serde(default)]
    pub route_id: Option<RouteId>,
}

/// A complaint as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub complaint_id: ComplaintId,
    pub citizen_name: String,
    pub contact_no: String,
    pub location: String,
    pub description: String,
    pub filed_at: DateTime<Utc>,
    pub department_id: DepartmentId,
    pub route_id: Option<RouteId>,
    pub assigned_employee: Option<EmployeeId>,
    pub status: ComplaintStatus,
}

/// A listing row: the complaint joined with its route name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintView {
    pub complaint_id: ComplaintId,
    pub citizen_name: String,
    pub contact_no: String,
    pub location: String,
    pub description: String,
    pub filed_at: DateTime<Utc>,
    pub department_id: DepartmentId,
    pub route_id: Option<RouteId>,
    pub assigned_employee: Option<EmployeeId>,
    pub status: ComplaintStatus,
    pub route_name: Option<String>,
}

/// One assignment event. Immutable once written; creation counts as the
/// first event for a complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub assign_id: i64,
    pub employee_id: EmployeeId,
    pub vehicle_id: Option<VehicleId>,
    pub route_id: Option<RouteId>,
    pub assigned_at: DateTime<Utc>,
}

pub struct ComplaintDesk {
    store: TrackStore,
}

impl ComplaintDesk {
    pub fn new(store: TrackStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    // ── Intake ─────────────────────────────────────────────────

    /// File a complaint. The least-loaded eligible employee of the target
    /// department receives it; if the department has none, nothing is
    /// persisted. Not idempotent: a retried call files a second
    /// complaint.
    pub fn create_complaint(&self, input: &NewComplaint) -> TrackResult<ComplaintId> {
        validate_intake(input)?;
        let (complaint_id, assignee) = self.store.create_complaint_assigned(input, Utc::now())?;
        log::debug!(
            "complaint {complaint_id} filed in dept {} -> employee {assignee}",
            input.department_id
        );
        Ok(complaint_id)
    }

    /// Which employee would receive the next complaint for a department.
    /// A snapshot only: the answer is not reserved, and a concurrent
    /// intake may take it first.
    pub fn select_assignee(&self, department_id: DepartmentId) -> TrackResult<EmployeeId> {
        let workloads = self.store.open_task_counts(department_id)?;
        workload::pick_least_loaded(&workloads).ok_or(TrackError::NoCandidate {
            department: department_id,
        })
    }

    // ── Status ─────────────────────────────────────────────────

    /// Move a complaint through the status machine. Closing is gated to
    /// Managers by policy; resolving is open to the assigned employee or
    /// a Manager.
    pub fn update_status(
        &self,
        complaint_id: ComplaintId,
        new_status: ComplaintStatus,
        caller: Option<&Caller>,
    ) -> TrackResult<()> {
        let op = if new_status == ComplaintStatus::Closed {
            Operation::CloseComplaint
        } else {
            Operation::UpdateStatus
        };
        policy::decide(caller, op).into_result()?;
        let Some(caller) = caller else {
            return Err(TrackError::NotAuthenticated);
        };

        let complaint = self.store.get_complaint(complaint_id)?;
        if !complaint.status.can_become(new_status) {
            log::warn!(
                "rejected transition '{}' -> '{new_status}' on complaint {complaint_id}",
                complaint.status
            );
            return Err(TrackError::InvalidTransition {
                from: complaint.status,
                to: new_status,
            });
        }
        if caller.role != Role::Manager
            && complaint.assigned_employee != Some(caller.employee_id)
        {
            return Err(TrackError::InsufficientRole {
                operation: op.label(),
            });
        }
        self.store.update_complaint_status(complaint_id, new_status)
    }

    // ── Reassignment ───────────────────────────────────────────

    /// Hand a complaint to a different employee. Forces the status back
    /// to `In Progress` and appends the assignment log entry, both in one
    /// transaction. The complaint's route rides along into the log.
    pub fn reassign(
        &self,
        complaint_id: ComplaintId,
        employee_id: EmployeeId,
        vehicle_id: Option<VehicleId>,
        caller: Option<&Caller>,
    ) -> TrackResult<()> {
        policy::decide(caller, Operation::Reassign).into_result()?;
        self.store
            .reassign_complaint(complaint_id, employee_id, vehicle_id, Utc::now())?;
        log::debug!("complaint {complaint_id} reassigned to employee {employee_id}");
        Ok(())
    }

    // ── Listing ────────────────────────────────────────────────

    /// List complaints the caller may see, newest first. The role scope
    /// is applied before the caller's filters, so filters can only
    /// narrow the result.
    pub fn list_complaints(
        &self,
        caller: Option<&Caller>,
        filter: &ComplaintFilter,
    ) -> TrackResult<Vec<ComplaintView>> {
        policy::decide(caller, Operation::ListComplaints).into_result()?;
        let predicate = Predicate::build(&scope_for(caller), filter);
        self.store.list_complaints(&predicate)
    }
}

fn validate_intake(input: &NewComplaint) -> TrackResult<()> {
    if input.citizen_name.trim().is_empty()
        || input.contact_no.trim().is_empty()
        || input.description.trim().is_empty()
        || input.department_id <= 0
    {
        return Err(TrackError::Validation(
            "name, contact, description, and department are required",
        ));
    }
    Ok(())
}
