//! Read-only reporting.
//!
//! Earlier revisions of this system kept an allow-list of database view
//! names and spliced the requested name into the query text. Reportable
//! views are now a closed enum: each variant maps to one fixed query, and
//! a name that does not parse is rejected before any SQL runs.

use crate::{
    error::{TrackError, TrackResult},
    identity::Caller,
    policy::{self, Operation},
    store::TrackStore,
    types::RouteId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The reportable views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportView {
    PendingComplaints,
    VehicleUsage,
    DepartmentSummary,
    WasteCollectionStats,
    EmployeePerformance,
    EmployeeTasks,
}

impl ReportView {
    pub const ALL: [ReportView; 6] = [
        ReportView::PendingComplaints,
        ReportView::VehicleUsage,
        ReportView::DepartmentSummary,
        ReportView::WasteCollectionStats,
        ReportView::EmployeePerformance,
        ReportView::EmployeeTasks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportView::PendingComplaints => "pending_complaints",
            ReportView::VehicleUsage => "vehicle_usage",
            ReportView::DepartmentSummary => "department_summary",
            ReportView::WasteCollectionStats => "waste_collection_stats",
            ReportView::EmployeePerformance => "employee_performance",
            ReportView::EmployeeTasks => "employee_tasks",
        }
    }

    /// Unknown names are rejected here, not against the database.
    pub fn parse(name: &str) -> TrackResult<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == name)
            .ok_or(TrackError::Validation("unknown report view"))
    }
}

/// Dashboard headline numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsOverview {
    pub pending: i64,
    pub resolved: i64,
    pub vehicle_usage: Vec<VehicleUsageRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleUsageRow {
    pub vehicle_no: String,
    pub total_assignments: i64,
}

/// A collection tonnage entry for one route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWasteRecord {
    pub route_id: RouteId,
    #[serde(default)]
    pub waste_type: Option<String>,
    pub weight_kg: f64,
    #[serde(default)]
    pub collection_date: Option<DateTime<Utc>>,
}

pub struct Reports {
    store: TrackStore,
}

impl Reports {
    pub fn new(store: TrackStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    /// Run one reportable view. Rows come back as JSON objects keyed by
    /// column name; the reporting layer is read-only and pre-aggregated.
    pub fn run(&self, view: ReportView) -> TrackResult<Vec<serde_json::Value>> {
        self.store.report_rows(view)
    }

    pub fn stats_overview(&self) -> TrackResult<StatsOverview> {
        let (pending, resolved) = self.store.pending_resolved_counts()?;
        let vehicle_usage = self.store.top_vehicle_usage(10)?;
        Ok(StatsOverview {
            pending,
            resolved,
            vehicle_usage,
        })
    }

    /// Record collected tonnage for a route.
    pub fn record_collection(
        &self,
        caller: Option<&Caller>,
        record: &NewWasteRecord,
    ) -> TrackResult<i64> {
        policy::decide(caller, Operation::RecordWaste).into_result()?;
        if record.route_id <= 0 || record.weight_kg <= 0.0 {
            return Err(TrackError::Validation("route and weight are required"));
        }
        let date = record.collection_date.unwrap_or_else(Utc::now);
        self.store
            .insert_waste_record(record.route_id, record.waste_type.as_deref(), record.weight_kg, date)
    }
}
