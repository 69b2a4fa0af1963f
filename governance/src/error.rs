//! Governance error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GovernanceError {
    #[error("Malformed {kind} record: {reason}")]
    MalformedRecord { kind: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, GovernanceError>;
