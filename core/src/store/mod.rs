//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Components call store methods — they never execute SQL directly.
//! The two multi-statement operations (intake, reassignment) run inside
//! one transaction each; everything else is a single statement.

mod complaint;
mod employee;
mod reference;

use crate::error::TrackResult;
use rusqlite::Connection;

pub struct TrackStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl TrackStore {
    pub fn open(path: &str) -> TrackResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> TrackResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database
    /// (isolated). For file-based databases, this opens the same file.
    /// Shared access to one in-memory database goes through an
    /// `open()` URI with `mode=memory&cache=shared`.
    pub fn reopen(&self) -> TrackResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> TrackResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_employees.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_complaints.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/004_waste_records.sql"))?;
        Ok(())
    }
}
