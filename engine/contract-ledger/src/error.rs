//! Error types for the contract ledger

use crate::types::ContractId;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Storage-level failures raised by a [`ContractLedger`](crate::ContractLedger) backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A write referenced a contract the ledger does not hold
    #[error("Contract not found: {0}")]
    NotFound(ContractId),

    /// An insert reused an id that is already stored
    #[error("Contract already exists: {0}")]
    AlreadyExists(ContractId),

    /// A batch would leave the ledger in a state that breaks a record invariant
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Backend failure (I/O, connection, serialization, ...)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a new invariant violation error
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
