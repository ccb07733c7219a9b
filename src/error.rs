//! Error types for revert detection
//!
//! Only construction can fail inside the detector itself. The remaining
//! variants belong to the document reader and the revision status check.

use thiserror::Error;

/// Errors produced by the detector and its surrounding readers
#[derive(Error, Debug)]
pub enum RevertError {
    #[error("invalid radius {0}: expected a positive integer")]
    InvalidRadius(usize),

    #[error("invalid window capacity: expected at least one slot")]
    InvalidCapacity,

    #[error("revision {0} not found")]
    RevisionNotFound(u64),

    #[error("malformed revision document on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RevertError>;
