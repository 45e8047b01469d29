//! Error types for the cap engine

use contract_ledger::{ContractId, LedgerError};
use thiserror::Error;

/// Result type alias for cap engine operations
pub type Result<T> = std::result::Result<T, CapEngineError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapEngineError {
    #[error("Invalid contract terms for contract {contract_id}: {reason}")]
    InvalidContractTerms { contract_id: ContractId, reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
