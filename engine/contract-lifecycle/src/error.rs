//! Error types for contract lifecycle operations

use cap_engine::CapEngineError;
use contract_ledger::{ContractId, LedgerError, PlayerId, TeamId};
use market_valuation::ValuationError;
use thiserror::Error;

/// Result type alias for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors returned by lifecycle operations
///
/// Every variant except `Storage` is a business-rule rejection that leaves the
/// ledger untouched. `Storage` wraps a failed ledger read or commit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Contract not found: {0}")]
    ContractNotFound(ContractId),

    #[error("Team {0} has no active contracts")]
    NoActiveContracts(TeamId),

    #[error("Contract {0} is not active")]
    NotActive(ContractId),

    #[error("Player {player_id} is under contract with team {team_id}")]
    ConflictingContract { player_id: PlayerId, team_id: TeamId },

    #[error("Player {player_id} is already under contract ({contract_id})")]
    AlreadyUnderContract { player_id: PlayerId, contract_id: ContractId },

    #[error("Restructure amount {amount} exceeds current year salary {salary}")]
    ExceedsSalary { amount: i64, salary: i64 },

    #[error("Invalid contract terms: {0}")]
    InvalidContractTerms(String),

    #[error("Valuation failed: {0}")]
    Valuation(#[from] ValuationError),

    #[error("Storage error: {0}")]
    Storage(#[from] LedgerError),
}

impl LifecycleError {
    /// True for rejections caused by the request rather than by storage
    pub fn is_business_rule(&self) -> bool {
        !matches!(self, LifecycleError::Storage(_))
    }
}

impl From<CapEngineError> for LifecycleError {
    fn from(err: CapEngineError) -> Self {
        match err {
            CapEngineError::Ledger(err) => LifecycleError::Storage(err),
            other => LifecycleError::InvalidContractTerms(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rule_classification() {
        assert!(LifecycleError::NotActive(ContractId(1)).is_business_rule());
        assert!(LifecycleError::ExceedsSalary { amount: 2, salary: 1 }.is_business_rule());
        assert!(!LifecycleError::Storage(LedgerError::storage("disk full")).is_business_rule());

        let overflow = ValuationError::OutOfRange { player_id: 3, kind: "market value" };
        assert!(LifecycleError::from(overflow).is_business_rule());
    }

    #[test]
    fn test_cap_engine_errors_map_by_kind() {
        let terms = CapEngineError::InvalidContractTerms {
            contract_id: ContractId(4),
            reason: "zero years".to_string(),
        };
        assert!(matches!(LifecycleError::from(terms), LifecycleError::InvalidContractTerms(_)));

        let ledger = CapEngineError::Ledger(LedgerError::NotFound(ContractId(4)));
        assert!(matches!(LifecycleError::from(ledger), LifecycleError::Storage(_)));
    }
}
