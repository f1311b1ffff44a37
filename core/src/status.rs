//! Complaint status lifecycle.
//!
//! Creation always lands on `In Progress` — the intake path pairs every
//! insert with an assignment, so an unassigned "Open" complaint is not
//! reachable through it. `Open` exists for rows imported from older data;
//! the only way out of it (and out of `Closed`) is reassignment.

use crate::error::{TrackError, TrackResult};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    /// The TEXT stored in the `status` column. `In Progress` keeps the
    /// space existing rows carry.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Open => "Open",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
            ComplaintStatus::Closed => "Closed",
        }
    }

    pub fn parse(s: &str) -> TrackResult<Self> {
        match s {
            "Open" => Ok(ComplaintStatus::Open),
            "In Progress" => Ok(ComplaintStatus::InProgress),
            "Resolved" => Ok(ComplaintStatus::Resolved),
            "Closed" => Ok(ComplaintStatus::Closed),
            _ => Err(TrackError::Validation("unknown complaint status")),
        }
    }

    /// `Closed` is terminal: no `update_status` transition leaves it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComplaintStatus::Closed)
    }

    /// Counts toward an employee's open-task load.
    pub fn is_open_task(&self) -> bool {
        matches!(self, ComplaintStatus::Open | ComplaintStatus::InProgress)
    }

    /// Legal `update_status` moves. Self-transitions are not legal, and no
    /// transition targets `Open` or `In Progress`; reassignment is the
    /// only path back to `In Progress`.
    pub fn can_become(self, next: ComplaintStatus) -> bool {
        matches!(
            (self, next),
            (ComplaintStatus::InProgress, ComplaintStatus::Resolved)
                | (ComplaintStatus::Resolved, ComplaintStatus::Closed)
        )
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for ComplaintStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ComplaintStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        ComplaintStatus::parse(s).map_err(|_| FromSqlError::Other("unrecognized status".into()))
    }
}
