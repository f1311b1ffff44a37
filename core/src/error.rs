use crate::status::ComplaintStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(&'static str),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not authorized to {operation}")]
    InsufficientRole { operation: &'static str },

    #[error("{what} {id} not found")]
    NotFound { what: &'static str, id: i64 },

    #[error("No available employees in department {department}")]
    NoCandidate { department: i64 },

    #[error("Cannot change status from '{from}' to '{to}'")]
    InvalidTransition {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },

    #[error("{0}")]
    Conflict(&'static str),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type TrackResult<T> = Result<T, TrackError>;
