//! Role gate for every operation the desk exposes.
//!
//! RULE: the decision function is pure. No storage, no clock, no session —
//! the caller context is whatever the authentication layer established,
//! and `None` is an anonymous caller (citizens filing complaints are not
//! logged in). Rules are evaluated in precedence order; first match wins.

use crate::error::{TrackError, TrackResult};
use crate::identity::{Caller, Role};

/// Everything a caller can ask the desk to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FileComplaint,
    ListComplaints,
    UpdateStatus,
    CloseComplaint,
    Reassign,
    ListAllEmployees,
    ChangeRole,
    DeleteEmployee,
    ListStaff,
    ListVehicles,
    RecordWaste,
}

impl Operation {
    /// Label used in denial messages.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::FileComplaint => "file a complaint",
            Operation::ListComplaints => "list complaints",
            Operation::UpdateStatus => "update complaint status",
            Operation::CloseComplaint => "close complaints",
            Operation::Reassign => "reassign complaints",
            Operation::ListAllEmployees => "list employees",
            Operation::ChangeRole => "change employee roles",
            Operation::DeleteEmployee => "delete employees",
            Operation::ListStaff => "list staff",
            Operation::ListVehicles => "list vehicles",
            Operation::RecordWaste => "record waste collection",
        }
    }

    /// Anonymous callers may file complaints and read the scoped listing;
    /// everything else needs a login.
    fn requires_auth(&self) -> bool {
        !matches!(self, Operation::FileComplaint | Operation::ListComplaints)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotAuthenticated,
    InsufficientRole { operation: Operation },
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Map a denial onto the error taxonomy.
    pub fn into_result(self) -> TrackResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(Denial::NotAuthenticated) => Err(TrackError::NotAuthenticated),
            Decision::Deny(Denial::InsufficientRole { operation }) => {
                Err(TrackError::InsufficientRole {
                    operation: operation.label(),
                })
            }
        }
    }
}

/// Decide whether `caller` may perform `op`. First matching rule wins:
/// authentication, then the Manager-only writes, then the Head-only
/// roster operations, then allow.
pub fn decide(caller: Option<&Caller>, op: Operation) -> Decision {
    let Some(caller) = caller else {
        if op.requires_auth() {
            return Decision::Deny(Denial::NotAuthenticated);
        }
        return Decision::Allow;
    };
    match op {
        Operation::CloseComplaint | Operation::Reassign if caller.role != Role::Manager => {
            Decision::Deny(Denial::InsufficientRole { operation: op })
        }
        Operation::ListAllEmployees | Operation::ChangeRole | Operation::DeleteEmployee
            if caller.role != Role::Head =>
        {
            Decision::Deny(Denial::InsufficientRole { operation: op })
        }
        _ => Decision::Allow,
    }
}
