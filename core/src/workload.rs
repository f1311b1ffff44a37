//! Least-loaded assignment selection.
//!
//! The store supplies `(employee_id, open task count)` pairs for the
//! eligible set of a department; the choice itself is pure so the
//! tie-break stays testable without a database. No lock is taken on the
//! counts: two concurrent intakes may pick the same employee, which skews
//! the balance for a moment but never leaves a complaint without exactly
//! one assignee.

use crate::types::EmployeeId;

/// Pick the employee with the fewest open tasks. Ties go to the lowest
/// employee id, so repeated runs over the same snapshot agree.
pub fn pick_least_loaded(workloads: &[(EmployeeId, i64)]) -> Option<EmployeeId> {
    workloads
        .iter()
        .min_by_key(|(emp_id, count)| (*count, *emp_id))
        .map(|(emp_id, _)| *emp_id)
}
