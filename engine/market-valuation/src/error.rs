//! Error types for market valuation

use contract_ledger::PlayerId;
use thiserror::Error;

/// Result type alias for valuation calculations
pub type Result<T> = std::result::Result<T, ValuationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValuationError {
    /// The valuation does not fit in whole currency units
    #[error("{kind} for player {player_id} is out of range")]
    OutOfRange { player_id: PlayerId, kind: &'static str },
}
