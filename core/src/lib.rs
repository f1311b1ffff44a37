//! wastetrack-core — the intake-and-assignment engine behind a municipal
//! waste-collection complaint desk.
//!
//! Citizens file complaints; the desk hands each one to the least-loaded
//! eligible employee of the target department, walks it through a
//! role-gated status lifecycle, and keeps an append-only log of every
//! assignment. Authentication and HTTP live outside this crate: callers
//! arrive as an explicit [`identity::Caller`] (or `None` for anonymous
//! citizens) on every operation.
//!
//! Layout:
//!   - [`policy`]    — pure allow/deny decisions per operation and role
//!   - [`workload`]  — least-loaded assignee selection
//!   - [`lifecycle`] — intake, status transitions, reassignment, listing
//!   - [`scope`]     — role-scoped read predicates
//!   - [`roster`]    — employee directory and reference lookups
//!   - [`report`]    — fixed reporting queries and headline stats
//!   - [`store`]     — the only module that talks to SQLite

pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod policy;
pub mod report;
pub mod roster;
pub mod scope;
pub mod status;
pub mod store;
pub mod types;
pub mod workload;
